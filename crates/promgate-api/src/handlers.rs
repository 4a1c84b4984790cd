//! REST API handlers.
//!
//! Each handler awaits one façade call; cancellation of the inbound request
//! drops the in-flight backend call with it.

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use promgate_query::{QueryError, QueryResult};

use crate::ApiState;

/// Sampling step for range queries.
const DEFAULT_STEP: Duration = Duration::from_secs(30);

/// Default range window when no bounds are given.
const DEFAULT_WINDOW_HOURS: i64 = 1;

/// Envelope for every metrics response.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// `"success"` or `"error"`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsResponse {
    fn success(data: QueryResult) -> Self {
        Self {
            status: "success",
            data: Some(data),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Envelope for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"success"` when the API is serving.
    pub status: &'static str,
    /// Human-readable liveness message.
    pub message: &'static str,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
}

fn respond(result: Result<QueryResult, QueryError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(MetricsResponse::success(data))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MetricsResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(MetricsResponse::error(message)),
    )
        .into_response()
}

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "success",
        message: "PromGate monitoring API is running",
        timestamp: Utc::now().timestamp(),
    })
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    query: Option<String>,
}

/// GET /api/metrics/query — custom instant query.
pub async fn query_metrics(
    State(state): State<ApiState>,
    Query(params): Query<QueryParams>,
) -> Response {
    let Some(expr) = params.query.filter(|q| !q.is_empty()) else {
        return bad_request("query parameter is required");
    };
    respond(state.prometheus.query(&expr).await)
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    query: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

/// GET /api/metrics/query_range — custom range query.
///
/// Bounds are RFC 3339; missing or unparseable values fall back to the last
/// hour ending now, sampled every 30 seconds.
pub async fn query_range_metrics(
    State(state): State<ApiState>,
    Query(params): Query<RangeParams>,
) -> Response {
    let Some(expr) = params.query.filter(|q| !q.is_empty()) else {
        return bad_request("query parameter is required");
    };

    let end = parse_rfc3339_or(params.end.as_deref(), Utc::now());
    let start = parse_rfc3339_or(
        params.start.as_deref(),
        end - chrono::Duration::hours(DEFAULT_WINDOW_HOURS),
    );

    respond(
        state
            .prometheus
            .query_range(&expr, start, end, DEFAULT_STEP)
            .await,
    )
}

fn parse_rfc3339_or(raw: Option<&str>, default: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(default)
}

/// GET /api/metrics/cpu
pub async fn cpu_metrics(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.cpu_metrics().await)
}

/// GET /api/metrics/memory
pub async fn memory_metrics(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.memory_metrics().await)
}

/// GET /api/metrics/disk
pub async fn disk_metrics(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.disk_metrics().await)
}

/// GET /api/metrics/pods
pub async fn pod_metrics(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.pod_metrics().await)
}

/// GET /api/metrics/nodes
pub async fn node_metrics(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.node_metrics().await)
}

/// GET /api/metrics/container/cpu
pub async fn container_cpu(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.container_cpu().await)
}

/// GET /api/metrics/container/memory
pub async fn container_memory(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.container_memory().await)
}

/// GET /api/metrics/targets
pub async fn all_targets(State(state): State<ApiState>) -> Response {
    respond(state.prometheus.all_targets().await)
}
