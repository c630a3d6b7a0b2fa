use anyhow::Result;
use std::sync::Arc;

use wf_core::ports::{ConnectedNode, NodeDiscoveryPort};
use wf_core::NodeId;

/// Lists reachable watches that can receive a watch face.
pub struct ListConnectedWatches {
    discovery: Arc<dyn NodeDiscoveryPort>,
}

impl ListConnectedWatches {
    pub fn new(discovery: Arc<dyn NodeDiscoveryPort>) -> Self {
        Self { discovery }
    }

    pub async fn execute(&self) -> Result<Vec<ConnectedNode>> {
        let nodes = self
            .discovery
            .connected_nodes()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list connected watches: {}", e))?;
        Ok(nodes
            .into_iter()
            .filter(|node| node.has_companion_app)
            .collect())
    }

    /// Whether `node_id` is connected and runs the companion app.
    pub async fn is_ready(&self, node_id: &NodeId) -> Result<bool> {
        Ok(self
            .execute()
            .await?
            .iter()
            .any(|node| &node.node_id == node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum DiscoveryOutcome {
        Ok(Vec<ConnectedNode>),
        Err(String),
    }

    struct TestDiscovery {
        outcome: DiscoveryOutcome,
    }

    #[async_trait]
    impl NodeDiscoveryPort for TestDiscovery {
        async fn connected_nodes(&self) -> anyhow::Result<Vec<ConnectedNode>> {
            match &self.outcome {
                DiscoveryOutcome::Ok(nodes) => Ok(nodes.clone()),
                DiscoveryOutcome::Err(message) => Err(anyhow::anyhow!(message.clone())),
            }
        }
    }

    fn node(id: &str, has_companion_app: bool) -> ConnectedNode {
        ConnectedNode {
            node_id: NodeId::from(id),
            display_name: format!("Watch {id}"),
            has_companion_app,
        }
    }

    #[tokio::test]
    async fn filters_out_watches_without_companion_app() {
        let use_case = ListConnectedWatches::new(Arc::new(TestDiscovery {
            outcome: DiscoveryOutcome::Ok(vec![node("a", true), node("b", false)]),
        }));

        let watches = use_case.execute().await.unwrap();
        assert_eq!(watches, vec![node("a", true)]);
        assert!(use_case.is_ready(&NodeId::from("a")).await.unwrap());
        assert!(!use_case.is_ready(&NodeId::from("b")).await.unwrap());
    }

    #[tokio::test]
    async fn discovery_error_is_reported_with_context() {
        let use_case = ListConnectedWatches::new(Arc::new(TestDiscovery {
            outcome: DiscoveryOutcome::Err("node client offline".to_string()),
        }));

        let err = use_case.execute().await.unwrap_err();
        assert!(err.to_string().contains("Failed to list connected watches"));
        assert!(err.to_string().contains("node client offline"));
    }
}
