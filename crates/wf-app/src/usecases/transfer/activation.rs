//! Watch-side activation of a pushed watch face.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};
use wf_core::ports::{ActivationPermissionPort, OneShotFlagPort, WatchFacePushPort, WatchFaceSlot};
use wf_core::{ActivationState, ActivationStrategy};

/// Reads the device state, resolves the activation strategy and, when the
/// one-shot API is still available, activates the watch face itself.
pub struct ActivationCoordinator {
    push: Arc<dyn WatchFacePushPort>,
    permission: Arc<dyn ActivationPermissionPort>,
    one_shot: Arc<dyn OneShotFlagPort>,
    package_name: String,
}

impl ActivationCoordinator {
    pub fn new(
        push: Arc<dyn WatchFacePushPort>,
        permission: Arc<dyn ActivationPermissionPort>,
        one_shot: Arc<dyn OneShotFlagPort>,
        package_name: impl Into<String>,
    ) -> Self {
        Self {
            push,
            permission,
            one_shot,
            package_name: package_name.into(),
        }
    }

    pub async fn current_state(&self) -> anyhow::Result<ActivationState> {
        let has_active_watch_face = self
            .push
            .is_watch_face_active(&self.package_name)
            .await
            .context("query active watch face")?;
        let has_granted_permission = self.permission.is_granted().await?;
        let can_request_permission = self.permission.can_request().await?;
        let has_used_one_shot_api = self.one_shot.has_been_used().await?;

        Ok(ActivationState {
            has_active_watch_face,
            has_granted_permission,
            can_request_permission,
            has_used_one_shot_api,
        })
    }

    pub async fn current_strategy(&self) -> anyhow::Result<ActivationStrategy> {
        Ok(self.current_state().await?.resolve())
    }

    /// Resolves the strategy and performs the no-user-action activation when
    /// it applies. Returns the strategy that holds afterwards.
    ///
    /// The one-shot flag is consumed before the platform call. A failed call
    /// leaves the flag spent and the user falls back to a manual strategy.
    pub async fn activate(&self) -> anyhow::Result<ActivationStrategy> {
        let strategy = self.current_strategy().await?;
        match strategy {
            ActivationStrategy::CallSetActiveNoUserAction => {}
            ActivationStrategy::NoActionNeeded
            | ActivationStrategy::FollowPromptOnWatch
            | ActivationStrategy::LongPressToSet
            | ActivationStrategy::GoToWatchSettings => return Ok(strategy),
        }

        let slot = self
            .owned_slot()
            .await?
            .ok_or_else(|| anyhow::anyhow!("no installed watch face to activate"))?;

        if !self.one_shot.try_consume().await? {
            debug!("one-shot set-active already spent by another caller");
            return self.current_strategy().await;
        }

        info!(slot_id = %slot.slot_id, "activating pushed watch face via one-shot api");
        if let Err(e) = self.push.set_watch_face_as_active(&slot.slot_id).await {
            warn!(error = %e, slot_id = %slot.slot_id, "set active failed, one-shot api stays spent");
        }

        self.current_strategy().await
    }

    /// Strategy once the user dismissed the on-watch prompt. The prompt is
    /// spent, so only manual activation remains.
    pub async fn strategy_after_denied_prompt(&self) -> anyhow::Result<ActivationStrategy> {
        let state = self.current_state().await?;
        Ok(if state.has_active_watch_face {
            ActivationStrategy::NoActionNeeded
        } else if state.can_request_permission {
            ActivationStrategy::LongPressToSet
        } else {
            ActivationStrategy::GoToWatchSettings
        })
    }

    /// Slot holding this app's watch face, falling back to the first installed slot.
    async fn owned_slot(&self) -> anyhow::Result<Option<WatchFaceSlot>> {
        let slots = self.push.list_watch_faces().await?;
        Ok(slots
            .installed
            .iter()
            .find(|slot| slot.package_name == self.package_name)
            .or_else(|| slots.installed.first())
            .cloned())
    }
}
