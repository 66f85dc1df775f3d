use std::future::Future;
use std::sync::Arc;

use node_taint_kubeapi::KubeApi;

use super::*;

/// Read access to Nodes and CSINodes plus the conditional taint write.
pub trait NodeClient: Send + Sync {
    /// `Ok(None)` when the node does not exist.
    fn get_node(&self, name: &str) -> impl Future<Output = Result<Option<corev1::Node>>> + Send;

    /// `Ok(None)` when the CSINode does not exist.
    fn get_csi_node(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<storagev1::CSINode>>> + Send;

    /// Applies `swap` to the taints of `node`, failing with [`Error::Conflict`] when the
    /// node's taints no longer equal `swap.expected()`.
    fn replace_taints(
        &self,
        node: &str,
        swap: &TaintSwap,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl NodeClient for KubeApi {
    async fn get_node(&self, name: &str) -> Result<Option<corev1::Node>> {
        Ok(Self::get_node(self, name).await?)
    }

    async fn get_csi_node(&self, name: &str) -> Result<Option<storagev1::CSINode>> {
        Ok(Self::get_csi_node(self, name).await?)
    }

    async fn replace_taints(&self, node: &str, swap: &TaintSwap) -> Result<()> {
        let patch = swap.to_json_patch()?;
        match self.json_patch_node(node, patch).await {
            Ok(_) => Ok(()),
            // 422 is what the API server answers when a JSON patch `test` fails
            Err(kube::Error::Api(status)) if status.code == 409 || status.code == 422 => {
                tracing::debug!(node, ?status, "Conditional taint update rejected");
                Err(Error::Conflict {
                    node: node.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<C> NodeClient for Arc<C>
where
    C: NodeClient,
{
    fn get_node(&self, name: &str) -> impl Future<Output = Result<Option<corev1::Node>>> + Send {
        (**self).get_node(name)
    }

    fn get_csi_node(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<storagev1::CSINode>>> + Send {
        (**self).get_csi_node(name)
    }

    fn replace_taints(
        &self,
        node: &str,
        swap: &TaintSwap,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).replace_taints(node, swap)
    }
}
