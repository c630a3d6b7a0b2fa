use async_trait::async_trait;
use bytes::Bytes;

use crate::ids::{NodeId, TransferId};

/// Reliable point-to-point channel to another wearable node.
///
/// 可靠的点对点消息通道。
#[async_trait]
pub trait MessageChannelPort: Send + Sync {
    /// Sends a request on `path` and waits for the peer's reply payload.
    async fn send_request(
        &self,
        node_id: &NodeId,
        path: &str,
        payload: Vec<u8>,
    ) -> anyhow::Result<Vec<u8>>;

    /// Fire-and-forget message on `path`.
    async fn send_message(&self, node_id: &NodeId, path: &str, payload: Vec<u8>)
        -> anyhow::Result<()>;

    /// Streams a package to the peer. Returns once the peer accepted the bytes.
    async fn send_package(
        &self,
        node_id: &NodeId,
        transfer_id: &TransferId,
        package: Bytes,
    ) -> anyhow::Result<()>;
}

/// Receiving end of [`MessageChannelPort`], implemented by each device's
/// router.
#[async_trait]
pub trait InboundHandlerPort: Send + Sync {
    async fn on_request(&self, from: &NodeId, path: &str, payload: &[u8])
        -> anyhow::Result<Vec<u8>>;

    async fn on_message(&self, from: &NodeId, path: &str, payload: &[u8]) -> anyhow::Result<()>;

    async fn on_package(
        &self,
        from: &NodeId,
        transfer_id: &TransferId,
        package: Bytes,
    ) -> anyhow::Result<()>;
}
