//! promgate-config — the bootstrap assembler.
//!
//! Runs the discovery chain once at process start, applies degraded-mode
//! policy when it fails, runs the diagnostic health probe, and produces the
//! immutable [`BootstrapConfig`] every other component receives by reference.
//! There is no ambient global configuration.
//!
//! Degraded-mode policy: by default bootstrap never fails — when every
//! discovery strategy is exhausted the assembler substitutes the
//! `PROMETHEUS_URL` override or `http://localhost:9090` and logs a warning.
//! Setting `PROMETHEUS_REQUIRE_DISCOVERY=true` turns that silent fallback into
//! a hard startup error, unless an explicit override is present (a chosen
//! address is not a blind default).

use thiserror::Error;
use tracing::{info, warn};

use promgate_discovery::{DiscoverySettings, check_health, resolve_endpoint};

/// Final fallback when discovery fails and no override is set.
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";

/// Default API port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Errors from bootstrap assembly.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Strict mode: discovery was exhausted and no explicit override exists.
    #[error("discovery required but no strategy succeeded: {source}")]
    DiscoveryRequired {
        /// The final discovery failure.
        #[source]
        source: promgate_discovery::DiscoveryError,
    },

    /// `PORT` was set but not a valid port number.
    #[error("invalid PORT value {value:?}: {message}")]
    InvalidPort {
        /// The offending value.
        value: String,
        /// Parse failure description.
        message: String,
    },
}

/// Process-wide configuration, assembled exactly once during startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Base URL of the Prometheus backend. Never empty.
    pub prometheus_url: String,
    /// Port the API server listens on.
    pub port: u16,
    /// Environment name, for logging and the health endpoint.
    pub environment: String,
    /// Node IP when kubectl discovery produced the endpoint.
    pub node_ip: Option<String>,
    /// NodePort when kubectl discovery produced the endpoint.
    pub node_port: Option<String>,
}

/// Raw assembler inputs, normally read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API port.
    pub port: u16,
    /// Environment name.
    pub environment: String,
    /// URL substituted when discovery fails.
    pub fallback_url: String,
    /// Fail bootstrap instead of falling back silently.
    pub require_discovery: bool,
    /// Inputs for the discovery chain.
    pub discovery: DiscoverySettings,
}

impl Settings {
    /// Read settings from `PORT`, `ENVIRONMENT`, `PROMETHEUS_URL`,
    /// `PROMETHEUS_REQUIRE_DISCOVERY`, and the discovery variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT").ok().filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidPort {
                    value: raw.clone(),
                    message: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };

        let discovery = DiscoverySettings::from_env();

        Ok(Self {
            port,
            environment: env_or("ENVIRONMENT", DEFAULT_ENVIRONMENT),
            fallback_url: discovery
                .override_url
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMETHEUS_URL.to_string()),
            require_discovery: env_flag("PROMETHEUS_REQUIRE_DISCOVERY"),
            discovery,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Assemble the bootstrap configuration from the process environment.
///
/// # Errors
///
/// Fails only on an unparseable `PORT` or, in strict mode, on exhausted
/// discovery with no explicit override.
pub async fn load() -> Result<BootstrapConfig, ConfigError> {
    load_with(Settings::from_env()?).await
}

/// Assemble the bootstrap configuration from explicit settings.
///
/// Sequence: resolve → apply fallback policy → diagnostic health probe →
/// immutable config. Bounded by the discovery and probe sub-timeouts; never
/// blocks indefinitely.
///
/// # Errors
///
/// See [`load`].
pub async fn load_with(settings: Settings) -> Result<BootstrapConfig, ConfigError> {
    info!("discovering Prometheus endpoint");

    let mut config = BootstrapConfig {
        prometheus_url: String::new(),
        port: settings.port,
        environment: settings.environment,
        node_ip: None,
        node_port: None,
    };

    match resolve_endpoint(&settings.discovery).await {
        Ok(endpoint) => {
            config.prometheus_url = endpoint.url;
            config.node_ip = endpoint.node_ip;
            config.node_port = endpoint.node_port;
        }
        Err(e) => {
            if settings.require_discovery && settings.discovery.override_url.is_none() {
                return Err(ConfigError::DiscoveryRequired { source: e });
            }
            warn!(error = %e, "could not discover Prometheus endpoint");
            warn!(fallback = %settings.fallback_url, "falling back to default/environment URL");
            config.prometheus_url = settings.fallback_url;
        }
    }

    info!("validating Prometheus connection");
    if let Err(e) = check_health(&config.prometheus_url).await {
        warn!(error = %e, "Prometheus health check failed; API will start but metrics may be unavailable");
    }

    info!(
        prometheus_url = %config.prometheus_url,
        port = config.port,
        environment = %config.environment,
        node_ip = config.node_ip.as_deref().unwrap_or(""),
        node_port = config.node_port.as_deref().unwrap_or(""),
        "configuration loaded"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Discovery settings guaranteed to exhaust every strategy quickly.
    fn failing_discovery() -> DiscoverySettings {
        DiscoverySettings {
            marker_path: PathBuf::from("/nonexistent/promgate/token"),
            override_url: None,
            kubectl_program: "false".to_string(),
            ..DiscoverySettings::default()
        }
    }

    fn settings(discovery: DiscoverySettings) -> Settings {
        Settings {
            port: 8080,
            environment: "test".to_string(),
            fallback_url: DEFAULT_PROMETHEUS_URL.to_string(),
            require_discovery: false,
            discovery,
        }
    }

    #[tokio::test]
    async fn exhausted_discovery_falls_back_to_default() {
        let config = load_with(settings(failing_discovery())).await.unwrap();
        assert_eq!(config.prometheus_url, DEFAULT_PROMETHEUS_URL);
        assert_eq!(config.node_ip, None);
        assert_eq!(config.node_port, None);
    }

    #[tokio::test]
    async fn bootstrap_never_yields_an_empty_url() {
        // Resolver fails and the health check against localhost:9090 will
        // also fail in the test environment; load still succeeds.
        let config = load_with(settings(failing_discovery())).await.unwrap();
        assert!(!config.prometheus_url.is_empty());
    }

    #[tokio::test]
    async fn successful_discovery_populates_node_fields() {
        let marker = tempfile::NamedTempFile::new().unwrap();
        let discovery = DiscoverySettings {
            marker_path: marker.path().to_path_buf(),
            ..DiscoverySettings::default()
        };

        let config = load_with(settings(discovery)).await.unwrap();
        assert_eq!(
            config.prometheus_url,
            "http://kube-prom-stack-kube-prome-prometheus.monitoring.svc.cluster.local:9090"
        );
        assert_eq!(config.node_ip, None);
        assert_eq!(config.node_port, None);
    }

    #[tokio::test]
    async fn strict_mode_fails_without_an_override() {
        let mut s = settings(failing_discovery());
        s.require_discovery = true;

        let err = load_with(s).await.unwrap_err();
        assert!(matches!(err, ConfigError::DiscoveryRequired { .. }));
    }

    #[tokio::test]
    async fn strict_mode_is_satisfied_by_an_explicit_override() {
        let mut discovery = failing_discovery();
        discovery.override_url = Some("http://pinned:9090".to_string());

        let mut s = settings(discovery);
        s.require_discovery = true;

        let config = load_with(s).await.unwrap();
        assert_eq!(config.prometheus_url, "http://pinned:9090");
    }
}
