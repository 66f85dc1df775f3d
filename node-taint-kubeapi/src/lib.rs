use std::fmt;

use kube::api;
use node_taint_ext as k8s;

use k8s::corev1;
use k8s::storagev1;

pub struct KubeApi {
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with the default Kubernetes client
    /// (in-cluster config or the local kubeconfig).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = node_taint_kubeapi::KubeApi::new().await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self { client }
    }

    /// Fetches the Node named `name`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the API server answers 404, the Node otherwise.
    pub async fn get_node(&self, name: &str) -> kube::Result<Option<corev1::Node>> {
        self.nodes().get_opt(name).await
    }

    /// Fetches the CSINode named `name`. CSINodes share the name of the Node they describe.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the API server answers 404, the CSINode otherwise.
    pub async fn get_csi_node(&self, name: &str) -> kube::Result<Option<storagev1::CSINode>> {
        self.csi_nodes().get_opt(name).await
    }

    /// Applies an RFC 6902 JSON patch to the Node named `name` in a single request.
    ///
    /// The API server applies all operations or none of them, so a failing `test`
    /// operation rejects the whole patch.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(api: &node_taint_kubeapi::KubeApi) -> kube::Result<()> {
    /// let patch = serde_json::json!([
    ///     { "op": "test", "path": "/spec/unschedulable", "value": true },
    ///     { "op": "replace", "path": "/spec/unschedulable", "value": false },
    /// ]);
    /// api.json_patch_node("node-1", patch).await?;
    /// # Ok(()) }
    /// ```
    pub async fn json_patch_node(
        &self,
        name: &str,
        patch: serde_json::Value,
    ) -> kube::Result<corev1::Node> {
        let patch = serde_json::from_value(patch).map_err(kube::Error::SerdeError)?;
        tracing::trace!(name, "Sending JSON patch for node");
        self.nodes()
            .patch(
                name,
                &api::PatchParams::default(),
                &api::Patch::<()>::Json(patch),
            )
            .await
    }

    /// Returns an Api handle scoped to all Nodes using the configured Kubernetes client.
    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    fn csi_nodes(&self) -> api::Api<storagev1::CSINode> {
        api::Api::all(self.client.clone())
    }
}

impl fmt::Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, redacting the `client`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeApi")
            .field("client", &"<kube::Client>")
            .finish()
    }
}
