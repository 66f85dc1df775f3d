use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use node_taint_ext::{CSINodeExt as _, NodeExt};

use super::*;

/// In-memory cluster with API server semantics for the conditional taint write.
#[derive(Debug, Default)]
pub(crate) struct FakeCluster {
    nodes: Mutex<BTreeMap<String, corev1::Node>>,
    csi_nodes: Mutex<BTreeMap<String, storagev1::CSINode>>,
    // Taints another writer sets right before the next conditional write lands.
    interference: Mutex<BTreeMap<String, Vec<corev1::Taint>>>,
    csi_reads: AtomicUsize,
    node_reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeCluster {
    pub(crate) fn with_node(
        self,
        name: &str,
        taints: impl IntoIterator<Item = corev1::Taint>,
    ) -> Self {
        let node = corev1::Node::new(name).with_taints(taints);
        self.nodes.lock().unwrap().insert(name.to_string(), node);
        self
    }

    pub(crate) fn with_csi_node(self, csinode: storagev1::CSINode) -> Self {
        self.put_csi_node(csinode);
        self
    }

    pub(crate) fn put_csi_node(&self, csinode: storagev1::CSINode) {
        let name = csinode.metadata.name.clone().unwrap_or_default();
        self.csi_nodes.lock().unwrap().insert(name, csinode);
    }

    pub(crate) fn with_driver(self, node: &str, driver: storagev1::CSINodeDriver) -> Self {
        self.with_csi_node(storagev1::CSINode::new(node).with_driver(driver))
    }

    /// Makes the next conditional write on `node` race with an external writer.
    pub(crate) fn interfere(&self, node: &str, taints: impl IntoIterator<Item = corev1::Taint>) {
        let taints = taints.into_iter().collect();
        self.interference
            .lock()
            .unwrap()
            .insert(node.to_string(), taints);
    }

    pub(crate) fn taints(&self, node: &str) -> Vec<corev1::Taint> {
        let nodes = self.nodes.lock().unwrap();
        let taints = nodes.get(node).map(|node| node.taints().to_vec());
        taints.unwrap_or_default()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn node_reads(&self) -> usize {
        self.node_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn csi_reads(&self) -> usize {
        self.csi_reads.load(Ordering::SeqCst)
    }
}

impl NodeClient for FakeCluster {
    async fn get_node(&self, name: &str) -> Result<Option<corev1::Node>> {
        self.node_reads.fetch_add(1, Ordering::SeqCst);
        let node = self.nodes.lock().unwrap().get(name).cloned();
        Ok(node)
    }

    async fn get_csi_node(&self, name: &str) -> Result<Option<storagev1::CSINode>> {
        self.csi_reads.fetch_add(1, Ordering::SeqCst);
        let csinode = self.csi_nodes.lock().unwrap().get(name).cloned();
        Ok(csinode)
    }

    async fn replace_taints(&self, node: &str, swap: &TaintSwap) -> Result<()> {
        // Same request the API server would receive.
        swap.to_json_patch()?;

        let external = self.interference.lock().unwrap().remove(node);
        let mut nodes = self.nodes.lock().unwrap();
        let Some(current) = nodes.get_mut(node) else {
            return Err(Error::not_found::<corev1::Node>(node));
        };
        if let Some(taints) = external {
            *current = current.clone().with_taints(taints);
        }
        if !swap.matches(current.taints()) {
            return Err(Error::Conflict {
                node: node.to_string(),
            });
        }
        *current = current.clone().with_taints(swap.desired().to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
