//! promgate-query — the query façade over the Prometheus HTTP API.
//!
//! Wraps a [`reqwest`] client with instant and range query operations plus the
//! fixed set of predefined metric queries. Results are opaque: the backend's
//! `data` object is passed through untouched, backend warnings are logged, and
//! backend-reported failures are wrapped in [`QueryError`].
//!
//! Construction is side-effect free; callers that want a connectivity signal
//! run [`PrometheusClient::readiness_check`] explicitly after construction.

pub mod client;
pub mod error;
pub mod queries;

pub use client::{PrometheusClient, QueryResult};
pub use error::QueryError;
