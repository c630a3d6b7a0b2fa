use async_trait::async_trait;

/// Persisted guard for the platform's one-shot "set active" API.
#[async_trait]
pub trait OneShotFlagPort: Send + Sync {
    async fn has_been_used(&self) -> anyhow::Result<bool>;

    /// Atomically marks the API as used.
    ///
    /// Returns `true` only for the single caller that flipped the flag; the
    /// flag is durable before this returns.
    async fn try_consume(&self) -> anyhow::Result<bool>;
}
