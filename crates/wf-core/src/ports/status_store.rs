use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::transfer::InstallationStatus;

pub type StatusStream = BoxStream<'static, InstallationStatus>;

/// Durable holder of the single current [`InstallationStatus`].
///
/// Last write wins. Callers that need compare-and-swap read, compare the
/// transfer id, then write inside their own serialization point.
#[async_trait]
pub trait InstallationStatusPort: Send + Sync {
    async fn read(&self) -> anyhow::Result<InstallationStatus>;

    async fn write(&self, status: &InstallationStatus) -> anyhow::Result<()>;

    /// Emits the current value on subscription, then every subsequent write.
    ///
    /// Each call is an independent subscription; the stream never ends on
    /// its own.
    async fn observe(&self) -> anyhow::Result<StatusStream>;
}
