use thiserror::Error;

use super::*;

#[derive(Debug, Error)]
pub enum Error {
    #[error(r#"{kind} "{name}" not found"#)]
    NotFound { kind: &'static str, name: String },

    #[error("driver {driver} not found on CSINode {node}")]
    DriverAbsent { node: String, driver: String },

    #[error("allocatable count not set for driver {driver} on CSINode {node}")]
    CapacityUnset { node: String, driver: String },

    #[error("taints on node {node} changed since they were read")]
    Conflict { node: String },

    #[error("failed to build taint patch: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("kube error: {0}")]
    Kube(#[from] kube::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn not_found<K>(name: impl ToString) -> Self
    where
        K: k8s::openapi::Resource,
    {
        Self::NotFound {
            kind: K::KIND,
            name: name.to_string(),
        }
    }

    /// Whether a later attempt can succeed without anything changing in this process.
    ///
    /// A patch that failed to serialize will fail the same way next time; everything
    /// else depends on cluster state that may still converge.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Serialize(_))
    }
}
