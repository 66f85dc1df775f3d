use node_taint_ext::NodeExt;

use super::*;

/// Outcome of a successful [`remove_taint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// No taint carried the key, nothing was written.
    Unchanged,
    /// `count` taints were removed in a single write.
    Removed { count: usize },
}

/// Removes every taint keyed `key` from `node`.
///
/// The write is a [`TaintSwap`] against the taints just read, so a concurrent change
/// to the node's taints surfaces as [`Error::Conflict`] instead of being overwritten.
/// Conflicts are not retried here.
pub async fn remove_taint<C>(client: &C, node: &str, key: &str) -> Result<Removal>
where
    C: NodeClient,
{
    let current = client
        .get_node(node)
        .await?
        .ok_or_else(|| Error::not_found::<corev1::Node>(node))?;

    tracing::debug!(key, node, "Removing taint");
    let observed = current.taints();
    let keep = filter_taints(observed, key);

    if keep.len() == observed.len() {
        tracing::debug!(key, node, "No taints to remove on node, skipping taint removal");
        return Ok(Removal::Unchanged);
    }

    let count = observed.len() - keep.len();
    let swap = TaintSwap::new(observed.to_vec(), keep);
    client.replace_taints(node, &swap).await?;

    tracing::info!(key, node, count, "Removed taint successfully");
    Ok(Removal::Removed { count })
}

/// Taints whose key differs from `key`, in their original order.
pub fn filter_taints(taints: &[corev1::Taint], key: &str) -> Vec<corev1::Taint> {
    taints
        .iter()
        .filter(|taint| {
            tracing::trace!(
                key = %taint.key,
                value = ?taint.value,
                effect = %taint.effect,
                "Checking taint"
            );
            let keep = taint.key != key;
            if !keep {
                tracing::debug!(
                    key = %taint.key,
                    effect = %taint.effect,
                    "Queued taint for removal"
                );
            }
            keep
        })
        .cloned()
        .collect()
}
