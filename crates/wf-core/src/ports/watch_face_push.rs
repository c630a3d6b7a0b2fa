//! Platform watch face install service.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ValidationToken;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub String);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An installed watch face occupying a platform slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchFaceSlot {
    pub slot_id: SlotId,
    pub package_name: String,
    pub version_code: u64,
}

/// Slots owned by this app on the watch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WatchFaceSlots {
    pub installed: Vec<WatchFaceSlot>,
    pub remaining_slot_count: u32,
}

impl WatchFaceSlots {
    pub fn has_free_slot(&self) -> bool {
        self.remaining_slot_count > 0
    }

    /// A transfer can land either in a free slot or on top of an installed one.
    pub fn can_accept_package(&self) -> bool {
        self.has_free_slot() || !self.installed.is_empty()
    }
}

/// Checked failures of the install service.
#[derive(Debug, Error)]
pub enum WatchFacePushError {
    #[error("list watch faces failed: {0}")]
    List(String),
    #[error("add watch face failed: {0}")]
    Add(String),
    #[error("update watch face in slot {slot_id} failed: {reason}")]
    Update { slot_id: SlotId, reason: String },
    #[error("set active watch face in slot {slot_id} failed: {reason}")]
    SetActive { slot_id: SlotId, reason: String },
    #[error("query active watch face failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait WatchFacePushPort: Send + Sync {
    async fn list_watch_faces(&self) -> Result<WatchFaceSlots, WatchFacePushError>;

    async fn add_watch_face(
        &self,
        package: Bytes,
        token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError>;

    async fn update_watch_face(
        &self,
        slot_id: &SlotId,
        package: Bytes,
        token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError>;

    /// One-shot platform call. Callers must guard it with a
    /// [`OneShotFlagPort`](super::OneShotFlagPort).
    async fn set_watch_face_as_active(&self, slot_id: &SlotId) -> Result<(), WatchFacePushError>;

    async fn is_watch_face_active(&self, package_name: &str) -> Result<bool, WatchFacePushError>;
}
