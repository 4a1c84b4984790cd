//! promgate-discovery — locates the Prometheus backend at startup.
//!
//! The backend's address is not known in advance: inside a Kubernetes cluster it
//! is reachable through the service DNS convention, outside it may be pinned by
//! an environment override or exposed through a NodePort that has to be looked up
//! with `kubectl`. This crate implements that ordered strategy chain plus the
//! bounded health probe run against whatever address wins.
//!
//! Strategy order (first success wins):
//!
//! 1. In-cluster service DNS, when the service-account token marker exists.
//! 2. Explicit URL override, used verbatim.
//! 3. `kubectl` NodePort discovery, bounded by a 10 second deadline.
//!
//! The resolver never falls back on its own: when every applicable strategy is
//! exhausted it returns an error, and the caller decides what a safe default is.

pub mod command;
pub mod error;
pub mod health;
pub mod probe;
pub mod resolver;

pub use error::{DiscoveryError, HealthCheckError};
pub use health::check_health;
pub use probe::in_cluster;
pub use resolver::{DiscoverySettings, Endpoint, resolve_endpoint};
