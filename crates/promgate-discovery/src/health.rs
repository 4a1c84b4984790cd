//! Bounded health probe against the resolved backend.
//!
//! One `curl` invocation of an instant `up` query, 5 second deadline, status
//! code inspected. A failure here is diagnostic only; the bootstrap sequence
//! logs it and carries on.

use std::time::Duration;

use tracing::debug;

use crate::command::run_capture;
use crate::error::{DiscoveryError, HealthCheckError};

/// Deadline for the probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe the backend with an instant `up` query and require a 200.
///
/// # Errors
///
/// Returns a [`HealthCheckError`] on spawn failure, timeout, or any non-200
/// status code.
pub async fn check_health(url: &str) -> Result<(), HealthCheckError> {
    let probe_url = format!("{url}/api/v1/query?query=up");

    let output = run_capture(
        "curl",
        &["-s", "-o", "/dev/null", "-w", "%{http_code}", probe_url.as_str()],
        HEALTH_TIMEOUT,
    )
    .await
    .map_err(|e| match e {
        DiscoveryError::Timeout { timeout_secs, .. } => HealthCheckError::Timeout {
            url: url.to_string(),
            timeout_secs,
        },
        other => HealthCheckError::Unreachable {
            url: url.to_string(),
            message: other.to_string(),
        },
    })?;

    expect_ok_status(&output)?;
    debug!(%url, "Prometheus health check passed");
    Ok(())
}

/// Interpret the status code reported by the probe.
fn expect_ok_status(code: &str) -> Result<(), HealthCheckError> {
    if code == "200" {
        Ok(())
    } else {
        Err(HealthCheckError::BadStatus {
            code: code.to_string(),
        })
    }
}
