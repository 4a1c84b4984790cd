//! In-cluster detection.
//!
//! The presence of the service-account token is the sole signal that the
//! process runs as a Kubernetes workload. A stat failure of any kind counts
//! as "not in cluster".

use std::path::Path;

/// Marker file mounted into every pod by the kubelet.
pub const SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Whether the process is running inside a Kubernetes cluster.
#[must_use]
pub fn in_cluster() -> bool {
    in_cluster_at(Path::new(SERVICE_ACCOUNT_TOKEN_PATH))
}

/// In-cluster check against an explicit marker path.
#[must_use]
pub fn in_cluster_at(marker: &Path) -> bool {
    marker.exists()
}
