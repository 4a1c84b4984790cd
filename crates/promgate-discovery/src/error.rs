//! Error types for endpoint discovery and the health probe.

use thiserror::Error;

/// Result type alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors from the endpoint resolution strategy chain.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery tool could not be spawned.
    #[error("failed to run {program}: {message}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// OS-level failure description.
        message: String,
    },

    /// The discovery tool exited with a non-zero status.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        /// Program that was executed.
        program: String,
        /// Exit status description.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The discovery tool did not finish within its deadline.
    #[error("{program} timed out after {timeout_secs}s")]
    Timeout {
        /// Program that was killed.
        program: String,
        /// The deadline that expired.
        timeout_secs: u64,
    },

    /// A required field came back empty from the cluster.
    #[error("{field} not found for service {service} in namespace {namespace}")]
    EmptyField {
        /// Which lookup came back empty ("NodePort" or "node IP").
        field: &'static str,
        /// Service the lookup was scoped to.
        service: String,
        /// Namespace the lookup was scoped to.
        namespace: String,
    },
}

/// Errors from the bounded health probe. Never fatal to bootstrap.
#[derive(Debug, Error)]
pub enum HealthCheckError {
    /// The probe process could not be spawned or the backend was unreachable.
    #[error("failed to connect to {url}: {message}")]
    Unreachable {
        /// URL that was probed.
        url: String,
        /// Failure description.
        message: String,
    },

    /// The probe did not finish within its deadline.
    #[error("health probe of {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL that was probed.
        url: String,
        /// The deadline that expired.
        timeout_secs: u64,
    },

    /// The backend answered with a non-200 status code.
    #[error("backend returned status code {code}")]
    BadStatus {
        /// HTTP status code as reported by the probe.
        code: String,
    },
}
