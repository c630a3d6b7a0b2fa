use async_trait::async_trait;

use crate::ids::ValidationToken;

/// Validates a watch face package and issues the token the watch needs to
/// install it.
#[async_trait]
pub trait PackageValidationPort: Send + Sync {
    async fn validate(&self, package: &[u8]) -> anyhow::Result<ValidationToken>;
}
