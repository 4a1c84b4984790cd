//! Bounded subprocess execution.
//!
//! Discovery shells out to cluster tooling (`kubectl`, `curl`). Every
//! invocation runs under a hard deadline: when it expires the child is
//! killed, never left to block the bootstrap sequence.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{DiscoveryError, DiscoveryResult};

/// Run a program with the given arguments and capture its trimmed stdout.
///
/// A non-zero exit status surfaces the trimmed stderr. The child inherits
/// nothing: stdin is closed, stdout/stderr are piped, and `kill_on_drop`
/// reaps it if the deadline expires or the caller goes away.
pub async fn run_capture(
    program: &str,
    args: &[&str],
    deadline: Duration,
) -> DiscoveryResult<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = timeout(deadline, cmd.output())
        .await
        .map_err(|_| DiscoveryError::Timeout {
            program: program.to_string(),
            timeout_secs: deadline.as_secs(),
        })?
        .map_err(|e| DiscoveryError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(DiscoveryError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
