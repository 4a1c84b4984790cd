//! Prometheus HTTP API client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::QueryError;

/// Opaque query result: the backend's `data` object (vector or matrix of
/// timestamped samples with label sets), passed through uninterpreted.
pub type QueryResult = serde_json::Value;

/// Wire envelope of the Prometheus HTTP API v1.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
}

/// Thin client over the Prometheus HTTP API.
///
/// Stateless after construction: cloning shares the underlying connection
/// pool, and no locking is needed across concurrent requests. Cancellation
/// propagates by dropping the in-flight call.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrometheusClient {
    /// Build a client for the given base URL. No network traffic happens
    /// here; use [`Self::readiness_check`] for a connectivity signal.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| QueryError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Best-effort connectivity probe: one instant `up` query, outcome
    /// logged, never surfaced.
    pub async fn readiness_check(&self) {
        match self.query("up").await {
            Ok(_) => info!(url = %self.base_url, "successfully connected to Prometheus"),
            Err(e) => warn!(url = %self.base_url, error = %e, "cannot connect to Prometheus"),
        }
    }

    /// Instant query evaluated at the backend's current time.
    ///
    /// # Errors
    ///
    /// Fails with a [`QueryError`] on transport failure or when the backend
    /// rejects the expression. Backend warnings are logged, not surfaced.
    pub async fn query(&self, expr: &str) -> Result<QueryResult, QueryError> {
        self.query_at(expr, None).await
    }

    /// Instant query evaluated at an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::query`].
    pub async fn query_at(
        &self,
        expr: &str,
        time: Option<DateTime<Utc>>,
    ) -> Result<QueryResult, QueryError> {
        let mut params = vec![("query", expr.to_string())];
        if let Some(t) = time {
            params.push(("time", t.timestamp().to_string()));
        }
        self.get("/api/v1/query", &params).await
    }

    /// Range query over `[start, end]` sampled every `step`.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::query`].
    pub async fn query_range(
        &self,
        expr: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<QueryResult, QueryError> {
        let params = vec![
            ("query", expr.to_string()),
            ("start", start.timestamp().to_string()),
            ("end", end.timestamp().to_string()),
            ("step", step.as_secs().to_string()),
        ];
        self.get("/api/v1/query_range", &params).await
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<QueryResult, QueryError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| QueryError::Transport {
                message: e.to_string(),
            })?;

        let envelope: ApiEnvelope =
            response
                .json()
                .await
                .map_err(|e| QueryError::InvalidResponse {
                    message: e.to_string(),
                })?;

        interpret(envelope)
    }
}

/// Map a wire envelope to a result. Warnings are logged and the payload is
/// returned exactly as the backend produced it.
fn interpret(envelope: ApiEnvelope) -> Result<QueryResult, QueryError> {
    if envelope.status != "success" {
        let error = envelope.error.unwrap_or_default();
        let message = match envelope.error_type {
            Some(kind) if !kind.is_empty() => format!("{kind}: {error}"),
            _ => error,
        };
        return Err(QueryError::Backend { message });
    }

    if !envelope.warnings.is_empty() {
        warn!(warnings = ?envelope.warnings, "query returned warnings");
    }

    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ApiEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn warnings_do_not_alter_the_result() {
        let data = json!({
            "resultType": "vector",
            "result": [{"metric": {"job": "node"}, "value": [1712000000.0, "42"]}]
        });
        let parsed = interpret(envelope(json!({
            "status": "success",
            "data": data.clone(),
            "warnings": ["query used very old data"]
        })))
        .unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn backend_error_carries_the_message() {
        let err = interpret(envelope(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "parse error at char 3"
        })))
        .unwrap_err();

        match err {
            QueryError::Backend { message } => {
                assert_eq!(message, "bad_data: parse error at char 3");
            }
            other => panic!("expected Backend, got {other}"),
        }
    }

    #[test]
    fn error_without_type_keeps_the_raw_message() {
        let err = interpret(envelope(json!({
            "status": "error",
            "error": "connection refused"
        })))
        .unwrap_err();

        match err {
            QueryError::Backend { message } => assert_eq!(message, "connection refused"),
            other => panic!("expected Backend, got {other}"),
        }
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = PrometheusClient::new("http://localhost:9090/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9090");
    }
}
