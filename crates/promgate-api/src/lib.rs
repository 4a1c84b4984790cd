//! promgate-api — the HTTP surface over the query façade.
//!
//! Thin layer: every route calls exactly one façade operation and serializes
//! a `{status, data}` or `{status, error}` envelope.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/health` | Liveness of the API itself |
//! | GET | `/api/metrics/query?query=` | Custom instant query |
//! | GET | `/api/metrics/query_range?query=&start=&end=` | Custom range query |
//! | GET | `/api/metrics/cpu` | Node CPU utilization |
//! | GET | `/api/metrics/memory` | Node memory utilization |
//! | GET | `/api/metrics/disk` | Filesystem utilization |
//! | GET | `/api/metrics/pods` | Pod inventory |
//! | GET | `/api/metrics/nodes` | Node inventory |
//! | GET | `/api/metrics/container/cpu` | Container CPU by pod/namespace |
//! | GET | `/api/metrics/container/memory` | Container memory by pod/namespace |
//! | GET | `/api/metrics/targets` | Scrape target liveness |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use promgate_query::PrometheusClient;

/// Shared state for API handlers.
///
/// The façade handle is cloned per request; it holds no mutable state.
#[derive(Clone)]
pub struct ApiState {
    /// Query façade for the resolved backend.
    pub prometheus: PrometheusClient,
}

/// Build the complete API router.
pub fn build_router(prometheus: PrometheusClient) -> Router {
    let state = ApiState { prometheus };

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics/query", get(handlers::query_metrics))
        .route("/metrics/query_range", get(handlers::query_range_metrics))
        .route("/metrics/cpu", get(handlers::cpu_metrics))
        .route("/metrics/memory", get(handlers::memory_metrics))
        .route("/metrics/disk", get(handlers::disk_metrics))
        .route("/metrics/pods", get(handlers::pod_metrics))
        .route("/metrics/nodes", get(handlers::node_metrics))
        .route("/metrics/container/cpu", get(handlers::container_cpu))
        .route("/metrics/container/memory", get(handlers::container_memory))
        .route("/metrics/targets", get(handlers::all_targets))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
