use async_trait::async_trait;

/// Runtime permission that allows setting the active watch face.
#[async_trait]
pub trait ActivationPermissionPort: Send + Sync {
    async fn is_granted(&self) -> anyhow::Result<bool>;

    /// `false` once the user denied the permission permanently.
    async fn can_request(&self) -> anyhow::Result<bool>;
}
