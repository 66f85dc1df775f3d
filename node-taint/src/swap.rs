use serde::Serialize;

use super::*;

const TAINTS_PATH: &str = "/spec/taints";

/// Compare-and-swap of a node's whole taint list.
///
/// The write applies only while the remote list still equals `expected`, the
/// list observed when the swap was computed.
#[derive(Clone, Debug, PartialEq)]
pub struct TaintSwap {
    expected: Vec<corev1::Taint>,
    desired: Vec<corev1::Taint>,
}

#[derive(Debug, Serialize)]
struct PatchOperation<'a> {
    op: &'static str,
    path: &'static str,
    value: &'a [corev1::Taint],
}

impl TaintSwap {
    pub fn new(expected: Vec<corev1::Taint>, desired: Vec<corev1::Taint>) -> Self {
        Self { expected, desired }
    }

    pub fn expected(&self) -> &[corev1::Taint] {
        &self.expected
    }

    pub fn desired(&self) -> &[corev1::Taint] {
        &self.desired
    }

    /// Whether `current` still matches what the swap was computed from.
    pub fn matches(&self, current: &[corev1::Taint]) -> bool {
        self.expected == current
    }

    /// Renders the swap as a JSON patch: `test` the observed list, then `replace` it.
    /// The API server applies both operations atomically.
    pub fn to_json_patch(&self) -> Result<serde_json::Value> {
        let operations = [
            PatchOperation {
                op: "test",
                path: TAINTS_PATH,
                value: &self.expected,
            },
            PatchOperation {
                op: "replace",
                path: TAINTS_PATH,
                value: &self.desired,
            },
        ];
        Ok(serde_json::to_value(operations)?)
    }
}
