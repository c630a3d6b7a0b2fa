//! In-process wearable transport.
//!
//! 进程内的可穿戴设备消息通道，手机与手表共用一个 [`LoopbackNetwork`]。
//!
//! Requests and package streams are delivered inline and complete when the
//! peer's handler returns. One-way messages are spawned so a handler may send
//! while it is itself being called.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};
use wf_core::ports::{ConnectedNode, InboundHandlerPort, MessageChannelPort, NodeDiscoveryPort};
use wf_core::{NodeId, TransferId};

/// Reachability of a node as seen by its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Up,
    /// Sends fail immediately.
    Down,
    /// Requests never get a reply and messages are lost.
    Unresponsive,
}

struct NodeEntry {
    display_name: String,
    has_companion_app: bool,
    link: LinkState,
    handler: Option<Weak<dyn InboundHandlerPort>>,
}

#[derive(Default)]
pub struct LoopbackNetwork {
    nodes: RwLock<HashMap<NodeId, NodeEntry>>,
}

impl LoopbackNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a node and returns its endpoint.
    pub fn join(
        self: &Arc<Self>,
        node_id: NodeId,
        display_name: impl Into<String>,
        has_companion_app: bool,
    ) -> LoopbackEndpoint {
        self.write_nodes().insert(
            node_id.clone(),
            NodeEntry {
                display_name: display_name.into(),
                has_companion_app,
                link: LinkState::Up,
                handler: None,
            },
        );
        LoopbackEndpoint {
            local: node_id,
            network: Arc::clone(self),
        }
    }

    /// Installs the router for `node_id`. The network keeps a weak
    /// reference; the owner keeps the handler alive.
    pub fn register_handler(&self, node_id: &NodeId, handler: &Arc<dyn InboundHandlerPort>) {
        if let Some(entry) = self.write_nodes().get_mut(node_id) {
            entry.handler = Some(Arc::downgrade(handler));
        }
    }

    pub fn set_link_state(&self, node_id: &NodeId, link: LinkState) {
        if let Some(entry) = self.write_nodes().get_mut(node_id) {
            entry.link = link;
        }
    }

    pub fn leave(&self, node_id: &NodeId) {
        self.write_nodes().remove(node_id);
    }

    fn route(&self, to: &NodeId) -> Result<(LinkState, Arc<dyn InboundHandlerPort>)> {
        let nodes = self.read_nodes();
        let entry = nodes
            .get(to)
            .ok_or_else(|| anyhow!("node {to} is not connected"))?;
        if entry.link == LinkState::Down {
            return Err(anyhow!("link to node {to} is down"));
        }
        let handler = entry
            .handler
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| anyhow!("node {to} has no inbound handler"))?;
        Ok((entry.link, handler))
    }

    fn read_nodes(&self) -> std::sync::RwLockReadGuard<'_, HashMap<NodeId, NodeEntry>> {
        self.nodes.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_nodes(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<NodeId, NodeEntry>> {
        self.nodes.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One node's view of the [`LoopbackNetwork`].
#[derive(Clone)]
pub struct LoopbackEndpoint {
    local: NodeId,
    network: Arc<LoopbackNetwork>,
}

impl LoopbackEndpoint {
    pub fn local_node_id(&self) -> &NodeId {
        &self.local
    }

    pub fn network(&self) -> &Arc<LoopbackNetwork> {
        &self.network
    }
}

#[async_trait]
impl MessageChannelPort for LoopbackEndpoint {
    async fn send_request(&self, node_id: &NodeId, path: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        let (link, handler) = self.network.route(node_id)?;
        debug!(from = %self.local, to = %node_id, path, bytes = payload.len(), "loopback request");
        if link == LinkState::Unresponsive {
            return std::future::pending().await;
        }
        handler.on_request(&self.local, path, &payload).await
    }

    async fn send_message(&self, node_id: &NodeId, path: &str, payload: Vec<u8>) -> Result<()> {
        let (link, handler) = self.network.route(node_id)?;
        debug!(from = %self.local, to = %node_id, path, bytes = payload.len(), "loopback message");
        if link == LinkState::Unresponsive {
            return Ok(());
        }
        let from = self.local.clone();
        let path = path.to_string();
        tokio::spawn(async move {
            if let Err(e) = handler.on_message(&from, &path, &payload).await {
                warn!(error = %e, from = %from, path = %path, "inbound message handler failed");
            }
        });
        Ok(())
    }

    async fn send_package(&self, node_id: &NodeId, transfer_id: &TransferId, package: Bytes) -> Result<()> {
        let (link, handler) = self.network.route(node_id)?;
        debug!(
            from = %self.local,
            to = %node_id,
            transfer_id = %transfer_id,
            bytes = package.len(),
            "loopback package"
        );
        if link == LinkState::Unresponsive {
            return Ok(());
        }
        handler.on_package(&self.local, transfer_id, package).await
    }
}

#[async_trait]
impl NodeDiscoveryPort for LoopbackEndpoint {
    async fn connected_nodes(&self) -> Result<Vec<ConnectedNode>> {
        let nodes = self.network.read_nodes();
        Ok(nodes
            .iter()
            .filter(|(id, entry)| **id != self.local && entry.link != LinkState::Down)
            .map(|(id, entry)| ConnectedNode {
                node_id: id.clone(),
                display_name: entry.display_name.clone(),
                has_companion_app: entry.has_companion_app,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Echo {
        messages: Mutex<Vec<(NodeId, String)>>,
        packages: Mutex<Vec<(TransferId, usize)>>,
    }

    #[async_trait]
    impl InboundHandlerPort for Echo {
        async fn on_request(&self, _from: &NodeId, _path: &str, payload: &[u8]) -> Result<Vec<u8>> {
            Ok(payload.iter().rev().copied().collect())
        }

        async fn on_message(&self, from: &NodeId, path: &str, _payload: &[u8]) -> Result<()> {
            self.messages
                .lock()
                .unwrap()
                .push((from.clone(), path.to_string()));
            Ok(())
        }

        async fn on_package(&self, _from: &NodeId, transfer_id: &TransferId, package: Bytes) -> Result<()> {
            self.packages
                .lock()
                .unwrap()
                .push((transfer_id.clone(), package.len()));
            Ok(())
        }
    }

    fn pair() -> (LoopbackEndpoint, LoopbackEndpoint, Arc<Echo>, Arc<dyn InboundHandlerPort>) {
        let network = LoopbackNetwork::new();
        let phone = network.join(NodeId::from("phone"), "Phone", false);
        let watch = network.join(NodeId::from("watch"), "Watch", true);
        let echo = Arc::new(Echo::default());
        let handler: Arc<dyn InboundHandlerPort> = echo.clone();
        network.register_handler(watch.local_node_id(), &handler);
        (phone, watch, echo, handler)
    }

    #[tokio::test]
    async fn request_is_answered_by_peer_handler() {
        let (phone, _watch, _echo, _handler) = pair();
        let reply = phone
            .send_request(&NodeId::from("watch"), "/echo", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(reply, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn discovery_lists_peers_but_not_self() {
        let (phone, _watch, _echo, _handler) = pair();
        let nodes = phone.connected_nodes().await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_id, NodeId::from("watch"));
        assert!(nodes[0].has_companion_app);
    }

    #[tokio::test]
    async fn messages_are_delivered_asynchronously() {
        let (phone, _watch, echo, _handler) = pair();
        phone
            .send_message(&NodeId::from("watch"), "/note", vec![])
            .await
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(
            echo.messages.lock().unwrap().clone(),
            vec![(NodeId::from("phone"), "/note".to_string())]
        );
    }

    #[tokio::test]
    async fn package_reaches_peer_before_send_returns() {
        let (phone, _watch, echo, _handler) = pair();
        phone
            .send_package(&NodeId::from("watch"), &TransferId::from("t1"), Bytes::from_static(b"abcd"))
            .await
            .unwrap();
        assert_eq!(
            echo.packages.lock().unwrap().clone(),
            vec![(TransferId::from("t1"), 4)]
        );
    }

    #[tokio::test]
    async fn down_link_fails_and_hides_node() {
        let (phone, watch, _echo, _handler) = pair();
        phone
            .network()
            .set_link_state(watch.local_node_id(), LinkState::Down);

        assert!(phone
            .send_request(&NodeId::from("watch"), "/echo", vec![])
            .await
            .is_err());
        assert!(phone.connected_nodes().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unresponsive_link_never_replies() {
        let (phone, watch, _echo, _handler) = pair();
        phone
            .network()
            .set_link_state(watch.local_node_id(), LinkState::Unresponsive);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            phone.send_request(&NodeId::from("watch"), "/echo", vec![]),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dropped_handler_makes_node_unreachable() {
        let (phone, _watch, _echo, handler) = pair();
        drop(handler);
        drop(_echo);
        assert!(phone
            .send_request(&NodeId::from("watch"), "/echo", vec![])
            .await
            .is_err());
    }
}
