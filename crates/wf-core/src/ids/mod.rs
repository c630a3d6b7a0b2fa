//! Identifier value objects shared by the phone and the watch.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Wearable network node identifier (the peer on the other end of a transfer).
///
/// 对端节点标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

/// Identifies one transfer attempt.
///
/// A new value is generated at the start of every attempt, retries included.
/// 每次传输尝试唯一。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(String);

/// Opaque credential proving that a watch face package passed validation.
///
/// Required by the platform install service and echoed back in the final
/// acknowledgement so the phone can match it to its own attempt.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationToken(String);

impl_id!(NodeId, TransferId, ValidationToken);

impl TransferId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

// Tokens end up in logs through Debug; keep only a prefix.
impl std::fmt::Debug for ValidationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "ValidationToken({prefix}…)")
    }
}
