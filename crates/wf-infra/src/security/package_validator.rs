//! Issues validation tokens for watch face packages.

use anyhow::Result;
use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use wf_core::ports::PackageValidationPort;
use wf_core::ValidationToken;

/// Upper bound on a watch face package accepted for transfer.
pub const MAX_PACKAGE_BYTES: usize = 64 * 1024 * 1024;

/// Token = hex(sha256(nonce || package)), salted per call so two pushes of
/// the same package never share a token.
pub struct Sha256PackageValidator {
    max_package_bytes: usize,
}

impl Sha256PackageValidator {
    pub fn new() -> Self {
        Self {
            max_package_bytes: MAX_PACKAGE_BYTES,
        }
    }

    pub fn with_max_package_bytes(max_package_bytes: usize) -> Self {
        Self { max_package_bytes }
    }
}

impl Default for Sha256PackageValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageValidationPort for Sha256PackageValidator {
    async fn validate(&self, package: &[u8]) -> Result<ValidationToken> {
        if package.is_empty() {
            anyhow::bail!("watch face package is empty");
        }
        if package.len() > self.max_package_bytes {
            anyhow::bail!(
                "watch face package is {} bytes, limit is {}",
                package.len(),
                self.max_package_bytes
            );
        }

        let mut nonce = [0u8; 16];
        rand::rng().fill_bytes(&mut nonce);

        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(package);
        Ok(ValidationToken::from_string(hex::encode(hasher.finalize())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_are_hex_sha256_and_unique() {
        let validator = Sha256PackageValidator::new();
        let first = validator.validate(b"package").await.unwrap();
        let second = validator.validate(b"package").await.unwrap();

        assert_eq!(first.as_str().len(), 64);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn rejects_empty_and_oversized_packages() {
        let validator = Sha256PackageValidator::with_max_package_bytes(4);
        assert!(validator.validate(b"").await.is_err());
        assert!(validator.validate(b"12345").await.is_err());
        assert!(validator.validate(b"1234").await.is_ok());
    }
}
