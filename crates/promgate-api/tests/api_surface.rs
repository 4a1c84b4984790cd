//! API surface tests.
//!
//! Drives the router with `tower::ServiceExt::oneshot` against a loopback
//! mock backend standing in for Prometheus.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use promgate_api::build_router;
use promgate_query::{PrometheusClient, queries};

type Expressions = Arc<Mutex<Vec<String>>>;

async fn mock_query(
    State(seen): State<Expressions>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let expr = params.get("query").cloned().unwrap_or_default();
    seen.lock().unwrap().push(expr.clone());

    if expr == "boom" {
        return Json(json!({"status": "error", "error": "expression rejected"}));
    }

    Json(json!({
        "status": "success",
        "data": {"resultType": "vector", "result": []}
    }))
}

async fn start_backend() -> (SocketAddr, Expressions) {
    let seen: Expressions = Arc::default();
    let app = Router::new()
        .route("/api/v1/query", get(mock_query))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, seen)
}

async fn router_against_backend() -> (Router, Expressions) {
    let (addr, seen) = start_backend().await;
    let client = PrometheusClient::new(&format!("http://{addr}")).unwrap();
    (build_router(client), seen)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_answers_without_a_backend() {
    // Point the client at a closed port; /api/health must not care.
    let client = PrometheusClient::new("http://127.0.0.1:9").unwrap();
    let router = build_router(client);

    let resp = router
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn custom_query_requires_the_query_parameter() {
    let (router, seen) = router_against_backend().await;

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/query")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
    // The backend must never have been consulted.
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn custom_query_passes_the_expression_through() {
    let (router, seen) = router_against_backend().await;

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/query?query=up")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["resultType"], "vector");
    assert_eq!(seen.lock().unwrap().as_slice(), ["up"]);
}

#[tokio::test]
async fn cpu_endpoint_issues_its_fixed_expression() {
    let (router, seen) = router_against_backend().await;

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/cpu")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(seen.lock().unwrap().as_slice(), [queries::CPU_UTILIZATION]);
}

#[tokio::test]
async fn backend_rejection_maps_to_an_error_envelope() {
    let (router, _seen) = router_against_backend().await;

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/query?query=boom")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("expression rejected")
    );
}

#[tokio::test]
async fn unreachable_backend_is_an_error_envelope_not_a_panic() {
    let client = PrometheusClient::new("http://127.0.0.1:9").unwrap();
    let router = build_router(client);

    let resp = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/targets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
}
