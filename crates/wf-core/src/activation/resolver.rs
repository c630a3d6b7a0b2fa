//! Activation strategy resolver.
//!
//! Pure function over the watch's current activation state.

use super::ActivationStrategy;

/// Snapshot of the watch state the resolver reads.
///
/// 激活决策所需的设备状态快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationState {
    /// The watch face owned by this app is the active one.
    pub has_active_watch_face: bool,
    /// The set-active permission is granted.
    pub has_granted_permission: bool,
    /// The permission can still be requested (not permanently denied).
    pub can_request_permission: bool,
    /// The one-shot set-active API was already spent on this device.
    pub has_used_one_shot_api: bool,
}

impl ActivationState {
    pub fn resolve(&self) -> ActivationStrategy {
        resolve(
            self.has_active_watch_face,
            self.has_granted_permission,
            self.can_request_permission,
            self.has_used_one_shot_api,
        )
    }
}

/// Maps device state to the action required to activate the watch face.
///
/// First match wins:
/// 1. already active → [`ActivationStrategy::NoActionNeeded`]
/// 2. granted, one-shot unused → [`ActivationStrategy::CallSetActiveNoUserAction`]
/// 3. requestable, one-shot unused → [`ActivationStrategy::FollowPromptOnWatch`]
/// 4. not requestable, not granted, one-shot unused → [`ActivationStrategy::GoToWatchSettings`]
/// 5. otherwise → [`ActivationStrategy::LongPressToSet`]
pub fn resolve(
    has_active_watch_face: bool,
    has_granted_permission: bool,
    can_request_permission: bool,
    has_used_one_shot_api: bool,
) -> ActivationStrategy {
    let strategy = decide(
        has_active_watch_face,
        has_granted_permission,
        can_request_permission,
        has_used_one_shot_api,
    );
    #[cfg(feature = "tracing")]
    tracing::trace!(
        has_active_watch_face,
        has_granted_permission,
        can_request_permission,
        has_used_one_shot_api,
        %strategy,
        "activation strategy resolved"
    );
    strategy
}

fn decide(
    has_active_watch_face: bool,
    has_granted_permission: bool,
    can_request_permission: bool,
    has_used_one_shot_api: bool,
) -> ActivationStrategy {
    if has_active_watch_face {
        ActivationStrategy::NoActionNeeded
    } else if has_granted_permission && !has_used_one_shot_api {
        ActivationStrategy::CallSetActiveNoUserAction
    } else if can_request_permission && !has_used_one_shot_api {
        ActivationStrategy::FollowPromptOnWatch
    } else if !can_request_permission && !has_granted_permission && !has_used_one_shot_api {
        ActivationStrategy::GoToWatchSettings
    } else {
        ActivationStrategy::LongPressToSet
    }
}
