//! Removal of the `<driver>/agent-not-ready` startup taint.
//!
//! Cluster operators may taint nodes with `<driver>/agent-not-ready` so that no pod
//! using the CSI driver lands on a node before the driver registered itself
//! (kubernetes/kubernetes#95911). Once the driver's CSINode entry reports an
//! allocatable volume count, [`TaintRemover`] lifts the taint.

use node_taint_ext as k8s;

use k8s::corev1;
use k8s::storagev1;

pub use backoff::BackoffPolicy;
pub use check::check_allocatable;
pub use client::NodeClient;
pub use error::{Error, Result};
pub use mutate::{Removal, filter_taints, remove_taint};
pub use remover::{RemovalHandle, RemovalState, TaintRemover};
pub use swap::TaintSwap;

mod backoff;
mod check;
mod client;
mod error;
#[cfg(test)]
mod fake;
mod mutate;
mod remover;
mod swap;

pub const AGENT_NOT_READY_TAINT_KEY_SUFFIX: &str = "/agent-not-ready";

/// Key of the startup taint guarding `driver`, e.g. `ebs.csi.aws.com/agent-not-ready`.
pub fn agent_not_ready_taint_key(driver: &str) -> String {
    format!("{driver}{AGENT_NOT_READY_TAINT_KEY_SUFFIX}")
}
