//! The endpoint resolution strategy chain.
//!
//! Each strategy either produces an [`Endpoint`] or fails the chain forward;
//! once a strategy applies, lower-priority ones are never consulted. The chain
//! performs no retries and no fallback of its own.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::command::run_capture;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::probe;

/// Port the in-cluster Prometheus service listens on.
const IN_CLUSTER_PORT: u16 = 9090;

/// Deadline shared by both `kubectl` lookups.
pub const KUBECTL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default namespace of the kube-prometheus-stack deployment.
pub const DEFAULT_NAMESPACE: &str = "monitoring";

/// Default service name of the Prometheus instance.
pub const DEFAULT_SERVICE: &str = "kube-prom-stack-kube-prome-prometheus";

/// A resolved backend address. Produced once per process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL of the Prometheus HTTP API.
    pub url: String,
    /// Node the NodePort was resolved against, when kubectl discovery ran.
    pub node_ip: Option<String>,
    /// The resolved NodePort, when kubectl discovery ran.
    pub node_port: Option<String>,
}

impl Endpoint {
    fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            node_ip: None,
            node_port: None,
        }
    }
}

/// Inputs scoping the strategy chain.
///
/// `marker_path` and `kubectl_program` exist so tests can substitute the
/// in-cluster marker and the external tool; production code uses
/// [`DiscoverySettings::from_env`].
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Namespace the Prometheus service lives in.
    pub namespace: String,
    /// Name of the Prometheus service.
    pub service: String,
    /// Explicit URL override, used verbatim when set and non-empty.
    pub override_url: Option<String>,
    /// Path of the in-cluster marker file.
    pub marker_path: PathBuf,
    /// Cluster CLI used for NodePort discovery.
    pub kubectl_program: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            override_url: None,
            marker_path: PathBuf::from(probe::SERVICE_ACCOUNT_TOKEN_PATH),
            kubectl_program: "kubectl".to_string(),
        }
    }
}

impl DiscoverySettings {
    /// Build settings from `PROMETHEUS_NAMESPACE`, `PROMETHEUS_SERVICE`, and
    /// `PROMETHEUS_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            namespace: env_or("PROMETHEUS_NAMESPACE", DEFAULT_NAMESPACE),
            service: env_or("PROMETHEUS_SERVICE", DEFAULT_SERVICE),
            override_url: std::env::var("PROMETHEUS_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Resolve the Prometheus endpoint through the ordered strategy chain.
///
/// # Errors
///
/// Returns a [`DiscoveryError`] when every applicable strategy is exhausted.
/// The caller owns degraded-mode policy; nothing is substituted here.
pub async fn resolve_endpoint(settings: &DiscoverySettings) -> DiscoveryResult<Endpoint> {
    if probe::in_cluster_at(&settings.marker_path) {
        info!("running inside Kubernetes cluster");
        return Ok(in_cluster_endpoint(settings));
    }

    info!("running outside Kubernetes cluster");

    if let Some(endpoint) = override_endpoint(settings) {
        info!(url = %endpoint.url, "using Prometheus URL from environment");
        return Ok(endpoint);
    }

    discover_from_kubectl(settings).await
}

/// Strategy 1: synthesize the in-cluster service DNS URL.
///
/// Pure string construction; cannot fail.
fn in_cluster_endpoint(settings: &DiscoverySettings) -> Endpoint {
    let url = format!(
        "http://{}.{}.svc.cluster.local:{IN_CLUSTER_PORT}",
        settings.service, settings.namespace
    );
    debug!(%url, "using in-cluster Prometheus endpoint");
    Endpoint::from_url(url)
}

/// Strategy 2: explicit override, no validation of well-formedness.
fn override_endpoint(settings: &DiscoverySettings) -> Option<Endpoint> {
    settings
        .override_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(Endpoint::from_url)
}

/// Strategy 3: look up the service NodePort and a node's InternalIP with
/// `kubectl`. Both lookups share one deadline.
async fn discover_from_kubectl(settings: &DiscoverySettings) -> DiscoveryResult<Endpoint> {
    let deadline = Instant::now() + KUBECTL_TIMEOUT;

    let node_port = run_capture(
        &settings.kubectl_program,
        &[
            "get",
            "svc",
            "-n",
            &settings.namespace,
            &settings.service,
            "-o",
            "jsonpath={.spec.ports[0].nodePort}",
        ],
        remaining(deadline),
    )
    .await?;

    if node_port.is_empty() {
        return Err(DiscoveryError::EmptyField {
            field: "NodePort",
            service: settings.service.clone(),
            namespace: settings.namespace.clone(),
        });
    }

    let node_ip = run_capture(
        &settings.kubectl_program,
        &[
            "get",
            "nodes",
            "-o",
            r#"jsonpath={.items[0].status.addresses[?(@.type=="InternalIP")].address}"#,
        ],
        remaining(deadline),
    )
    .await?;

    if node_ip.is_empty() {
        return Err(DiscoveryError::EmptyField {
            field: "node IP",
            service: settings.service.clone(),
            namespace: settings.namespace.clone(),
        });
    }

    let url = format!("http://{node_ip}:{node_port}");
    info!(
        namespace = %settings.namespace,
        service = %settings.service,
        %node_ip,
        %node_port,
        %url,
        "discovered Prometheus endpoint via kubectl"
    );

    Ok(Endpoint {
        url,
        node_ip: Some(node_ip),
        node_port: Some(node_port),
    })
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}
