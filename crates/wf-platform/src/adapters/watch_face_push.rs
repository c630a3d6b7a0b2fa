//! Simulated watch face push service.
//!
//! 模拟手表端的表盘安装服务：固定数量的槽位，每个槽位一个表盘。

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};
use wf_core::ports::{SlotId, WatchFacePushError, WatchFacePushPort, WatchFaceSlot, WatchFaceSlots};
use wf_core::ValidationToken;

#[derive(Debug, Default)]
struct PushState {
    installed: Vec<WatchFaceSlot>,
    active: Option<SlotId>,
    next_slot: u32,
}

#[derive(Debug)]
pub struct SimulatedWatchFacePush {
    package_name: String,
    max_slots: u32,
    state: Mutex<PushState>,
}

impl SimulatedWatchFacePush {
    pub fn new(package_name: impl Into<String>, max_slots: u32) -> Self {
        Self {
            package_name: package_name.into(),
            max_slots,
            state: Mutex::new(PushState::default()),
        }
    }

    pub fn active_slot(&self) -> Option<SlotId> {
        self.lock().active.clone()
    }

    pub fn installed(&self) -> Vec<WatchFaceSlot> {
        self.lock().installed.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PushState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_package(package: &Bytes, token: &ValidationToken) -> Result<(), String> {
        if package.is_empty() {
            return Err("empty package".to_string());
        }
        if token.as_str().is_empty() {
            return Err("missing validation token".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl WatchFacePushPort for SimulatedWatchFacePush {
    async fn list_watch_faces(&self) -> Result<WatchFaceSlots, WatchFacePushError> {
        let state = self.lock();
        let used = u32::try_from(state.installed.len()).unwrap_or(u32::MAX);
        Ok(WatchFaceSlots {
            installed: state.installed.clone(),
            remaining_slot_count: self.max_slots.saturating_sub(used),
        })
    }

    async fn add_watch_face(
        &self,
        package: Bytes,
        token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError> {
        Self::check_package(&package, token).map_err(WatchFacePushError::Add)?;
        let mut state = self.lock();
        if state.installed.len() as u64 >= u64::from(self.max_slots) {
            return Err(WatchFacePushError::Add("no free slot".to_string()));
        }
        state.next_slot += 1;
        let slot = WatchFaceSlot {
            slot_id: SlotId(format!("slot-{}", state.next_slot)),
            package_name: self.package_name.clone(),
            version_code: 1,
        };
        state.installed.push(slot.clone());
        info!(slot_id = %slot.slot_id, bytes = package.len(), "watch face added");
        Ok(slot)
    }

    async fn update_watch_face(
        &self,
        slot_id: &SlotId,
        package: Bytes,
        token: &ValidationToken,
    ) -> Result<WatchFaceSlot, WatchFacePushError> {
        let update_error = |reason: String| WatchFacePushError::Update {
            slot_id: slot_id.clone(),
            reason,
        };
        Self::check_package(&package, token).map_err(update_error)?;
        let mut state = self.lock();
        let slot = state
            .installed
            .iter_mut()
            .find(|slot| &slot.slot_id == slot_id)
            .ok_or_else(|| update_error("unknown slot".to_string()))?;
        slot.version_code += 1;
        info!(slot_id = %slot_id, version_code = slot.version_code, "watch face updated");
        Ok(slot.clone())
    }

    async fn set_watch_face_as_active(&self, slot_id: &SlotId) -> Result<(), WatchFacePushError> {
        let mut state = self.lock();
        if !state.installed.iter().any(|slot| &slot.slot_id == slot_id) {
            return Err(WatchFacePushError::SetActive {
                slot_id: slot_id.clone(),
                reason: "unknown slot".to_string(),
            });
        }
        state.active = Some(slot_id.clone());
        info!(slot_id = %slot_id, "watch face set as active");
        Ok(())
    }

    async fn is_watch_face_active(&self, package_name: &str) -> Result<bool, WatchFacePushError> {
        let state = self.lock();
        let active = state.active.as_ref().is_some_and(|active| {
            state
                .installed
                .iter()
                .any(|slot| &slot.slot_id == active && slot.package_name == package_name)
        });
        debug!(package_name, active, "active watch face queried");
        Ok(active)
    }
}
