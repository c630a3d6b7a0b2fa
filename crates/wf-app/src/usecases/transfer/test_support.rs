//! Hand-written fakes for the transfer use case tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use wf_core::ports::{
    ActivationPermissionPort, MessageChannelPort, OneShotFlagPort, SlotId, WatchFacePushError,
    WatchFacePushPort, WatchFaceSlot, WatchFaceSlots,
};
use wf_core::{NodeId, TransferId, ValidationToken};

pub const PACKAGE_NAME: &str = "com.example.androidify.watchface";

pub fn installed_slot(id: &str) -> WatchFaceSlot {
    WatchFaceSlot {
        slot_id: SlotId(id.to_string()),
        package_name: PACKAGE_NAME.to_string(),
        version_code: 1,
    }
}

#[derive(Default)]
pub struct FakeWatchFacePush {
    slots: Mutex<WatchFaceSlots>,
    active: AtomicBool,
    fail_install: AtomicBool,
    fail_set_active: AtomicBool,
    add_calls: AtomicUsize,
    update_calls: AtomicUsize,
    set_active_calls: AtomicUsize,
}

impl FakeWatchFacePush {
    pub fn with_slots(installed: Vec<WatchFaceSlot>, remaining_slot_count: u32) -> Arc<Self> {
        Arc::new(Self {
            slots: Mutex::new(WatchFaceSlots {
                installed,
                remaining_slot_count,
            }),
            ..Default::default()
        })
    }

    pub fn fail_install(&self) {
        self.fail_install.store(true, Ordering::SeqCst);
    }

    pub fn fail_set_active(&self) {
        self.fail_set_active.store(true, Ordering::SeqCst);
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn set_active_calls(&self) -> usize {
        self.set_active_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatchFacePushPort for FakeWatchFacePush {
    async fn list_watch_faces(&self) -> Result<WatchFaceSlots, WatchFacePushError> {
        Ok(self.slots.lock().unwrap().clone())
    }

    async fn add_watch_face(
        &self,
        _package: Bytes,
        _token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(WatchFacePushError::Add("invalid package".to_string()));
        }
        let mut slots = self.slots.lock().unwrap();
        if slots.remaining_slot_count == 0 {
            return Err(WatchFacePushError::Add("no free slot".to_string()));
        }
        slots.remaining_slot_count -= 1;
        let slot = installed_slot(&format!("slot-{}", slots.installed.len() + 1));
        slots.installed.push(slot.clone());
        Ok(slot)
    }

    async fn update_watch_face(
        &self,
        slot_id: &SlotId,
        _package: Bytes,
        _token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(WatchFacePushError::Update {
                slot_id: slot_id.clone(),
                reason: "invalid package".to_string(),
            });
        }
        let mut slots = self.slots.lock().unwrap();
        let slot = slots
            .installed
            .iter_mut()
            .find(|slot| &slot.slot_id == slot_id)
            .ok_or_else(|| WatchFacePushError::Update {
                slot_id: slot_id.clone(),
                reason: "unknown slot".to_string(),
            })?;
        slot.version_code += 1;
        Ok(slot.clone())
    }

    async fn set_watch_face_as_active(&self, slot_id: &SlotId) -> Result<(), WatchFacePushError> {
        self.set_active_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set_active.load(Ordering::SeqCst) {
            return Err(WatchFacePushError::SetActive {
                slot_id: slot_id.clone(),
                reason: "denied".to_string(),
            });
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_watch_face_active(&self, _package_name: &str) -> Result<bool, WatchFacePushError> {
        Ok(self.active.load(Ordering::SeqCst))
    }
}

pub struct FakePermission {
    granted: AtomicBool,
    can_request: AtomicBool,
}

impl FakePermission {
    pub fn new(granted: bool, can_request: bool) -> Arc<Self> {
        Arc::new(Self {
            granted: AtomicBool::new(granted),
            can_request: AtomicBool::new(can_request),
        })
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_can_request(&self, can_request: bool) {
        self.can_request.store(can_request, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActivationPermissionPort for FakePermission {
    async fn is_granted(&self) -> anyhow::Result<bool> {
        Ok(self.granted.load(Ordering::SeqCst))
    }

    async fn can_request(&self) -> anyhow::Result<bool> {
        Ok(self.can_request.load(Ordering::SeqCst))
    }
}

pub struct InMemoryOneShot {
    used: AtomicBool,
}

impl InMemoryOneShot {
    pub fn new(used: bool) -> Arc<Self> {
        Arc::new(Self {
            used: AtomicBool::new(used),
        })
    }
}

#[async_trait]
impl OneShotFlagPort for InMemoryOneShot {
    async fn has_been_used(&self) -> anyhow::Result<bool> {
        Ok(self.used.load(Ordering::SeqCst))
    }

    async fn try_consume(&self) -> anyhow::Result<bool> {
        Ok(!self.used.swap(true, Ordering::SeqCst))
    }
}

/// A message recorded by [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub node_id: NodeId,
    pub path: String,
    pub payload: Vec<u8>,
}

/// Channel that records one-way messages and rejects everything else.
#[derive(Default)]
pub struct RecordingChannel {
    messages: Mutex<Vec<SentMessage>>,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageChannelPort for RecordingChannel {
    async fn send_request(
        &self,
        _node_id: &NodeId,
        path: &str,
        _payload: Vec<u8>,
    ) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("unexpected request on {path}")
    }

    async fn send_message(
        &self,
        node_id: &NodeId,
        path: &str,
        payload: Vec<u8>,
    ) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(SentMessage {
            node_id: node_id.clone(),
            path: path.to_string(),
            payload,
        });
        Ok(())
    }

    async fn send_package(
        &self,
        _node_id: &NodeId,
        transfer_id: &TransferId,
        _package: Bytes,
    ) -> anyhow::Result<()> {
        anyhow::bail!("unexpected package for {transfer_id}")
    }
}
