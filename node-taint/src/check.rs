use node_taint_ext::{CSINodeDriverExt, CSINodeExt};

use super::*;

/// Succeeds once `driver` has registered an allocatable volume count on the CSINode
/// of `node`. A count of zero is still a registered count.
pub async fn check_allocatable<C>(client: &C, node: &str, driver: &str) -> Result<()>
where
    C: NodeClient,
{
    let csinode = client
        .get_csi_node(node)
        .await?
        .ok_or_else(|| Error::not_found::<storagev1::CSINode>(node))?;

    let Some(entry) = csinode.driver(driver) else {
        return Err(Error::DriverAbsent {
            node: node.to_string(),
            driver: driver.to_string(),
        });
    };

    let Some(count) = entry.allocatable_count() else {
        return Err(Error::CapacityUnset {
            node: node.to_string(),
            driver: driver.to_string(),
        });
    };

    tracing::debug!(node, driver, count, "CSINode allocatable count is set for driver");
    Ok(())
}
