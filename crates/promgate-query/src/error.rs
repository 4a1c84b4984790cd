//! Error types for the query façade.

use thiserror::Error;

/// Errors surfaced by the query façade.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The underlying HTTP client could not be constructed. The only
    /// process-fatal error in this crate.
    #[error("error creating Prometheus client: {message}")]
    ClientBuild {
        /// Builder failure description.
        message: String,
    },

    /// The request never produced a backend answer.
    #[error("query error: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },

    /// The backend rejected the query.
    #[error("query error: {message}")]
    Backend {
        /// The backend's error message, with its error type when present.
        message: String,
    },

    /// The backend answered with something that is not a query envelope.
    #[error("invalid response from backend: {message}")]
    InvalidResponse {
        /// Decode failure description.
        message: String,
    },
}
