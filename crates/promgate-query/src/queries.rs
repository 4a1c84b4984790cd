//! Predefined metric queries.
//!
//! Fixed PromQL expressions for the metrics the API exposes. Each convenience
//! method passes its expression through [`PrometheusClient::query`] unchanged.

use crate::client::{PrometheusClient, QueryResult};
use crate::error::QueryError;

/// Node CPU utilization percentage, derived from idle-mode CPU time.
pub const CPU_UTILIZATION: &str =
    r#"100 - (avg by(instance) (irate(node_cpu_seconds_total{mode="idle"}[5m])) * 100)"#;

/// Node memory utilization percentage.
pub const MEMORY_UTILIZATION: &str =
    r#"(1 - (node_memory_MemAvailable_bytes / node_memory_MemTotal_bytes)) * 100"#;

/// Filesystem utilization percentage, excluding virtual filesystems.
pub const DISK_UTILIZATION: &str = r#"(1 - (node_filesystem_avail_bytes{fstype!~"tmpfs|fuse.lxcfs|squashfs|vfat"} / node_filesystem_size_bytes{fstype!~"tmpfs|fuse.lxcfs|squashfs|vfat"})) * 100"#;

/// Pod inventory.
pub const POD_INFO: &str = "kube_pod_info";

/// Node inventory.
pub const NODE_INFO: &str = "kube_node_info";

/// Per-pod/namespace container CPU usage rate over a 5 minute window.
pub const CONTAINER_CPU: &str =
    r#"sum(rate(container_cpu_usage_seconds_total{container!=""}[5m])) by (pod, namespace)"#;

/// Per-pod/namespace container memory working set.
pub const CONTAINER_MEMORY: &str =
    r#"sum(container_memory_working_set_bytes{container!=""}) by (pod, namespace)"#;

/// Liveness of every scrape target.
pub const TARGETS_UP: &str = "up";

impl PrometheusClient {
    /// CPU utilization per instance.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn cpu_metrics(&self) -> Result<QueryResult, QueryError> {
        self.query(CPU_UTILIZATION).await
    }

    /// Memory utilization per instance.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn memory_metrics(&self) -> Result<QueryResult, QueryError> {
        self.query(MEMORY_UTILIZATION).await
    }

    /// Disk utilization per filesystem.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn disk_metrics(&self) -> Result<QueryResult, QueryError> {
        self.query(DISK_UTILIZATION).await
    }

    /// Pod inventory.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn pod_metrics(&self) -> Result<QueryResult, QueryError> {
        self.query(POD_INFO).await
    }

    /// Node inventory.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn node_metrics(&self) -> Result<QueryResult, QueryError> {
        self.query(NODE_INFO).await
    }

    /// Container CPU usage by pod and namespace.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn container_cpu(&self) -> Result<QueryResult, QueryError> {
        self.query(CONTAINER_CPU).await
    }

    /// Container memory working set by pod and namespace.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn container_memory(&self) -> Result<QueryResult, QueryError> {
        self.query(CONTAINER_MEMORY).await
    }

    /// Scrape target liveness.
    ///
    /// # Errors
    ///
    /// See [`PrometheusClient::query`].
    pub async fn all_targets(&self) -> Result<QueryResult, QueryError> {
        self.query(TARGETS_UP).await
    }
}
