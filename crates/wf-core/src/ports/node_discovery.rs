use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// A wearable currently reachable from this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedNode {
    pub node_id: NodeId,
    pub display_name: String,
    /// The companion watch app that receives watch faces is installed.
    pub has_companion_app: bool,
}

#[async_trait]
pub trait NodeDiscoveryPort: Send + Sync {
    async fn connected_nodes(&self) -> anyhow::Result<Vec<ConnectedNode>>;
}
