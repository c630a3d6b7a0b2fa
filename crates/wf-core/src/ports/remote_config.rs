use async_trait::async_trait;

/// Remote feature flags. Read at each decision point, never cached.
#[async_trait]
pub trait RemoteConfigPort: Send + Sync {
    async fn watch_faces_enabled(&self) -> anyhow::Result<bool>;
}
