use serde::{Deserialize, Serialize};

/// Action required to activate a pushed watch face.
///
/// 激活已推送表盘所需的操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStrategy {
    /// The pushed watch face is already active.
    NoActionNeeded,
    /// Permission granted and the one-shot API is still available: the watch
    /// activates the face itself.
    CallSetActiveNoUserAction,
    /// The watch shows a permission prompt the user has to accept.
    FollowPromptOnWatch,
    /// The user long-presses the current face and picks the new one.
    LongPressToSet,
    /// Permission was denied for good; the user has to open watch settings.
    GoToWatchSettings,
}

impl ActivationStrategy {
    pub const ALL: [ActivationStrategy; 5] = [
        ActivationStrategy::NoActionNeeded,
        ActivationStrategy::CallSetActiveNoUserAction,
        ActivationStrategy::FollowPromptOnWatch,
        ActivationStrategy::LongPressToSet,
        ActivationStrategy::GoToWatchSettings,
    ];

    /// Whether the transfer stays open waiting for the user to answer a
    /// prompt on the watch.
    pub fn requires_user_follow_up(&self) -> bool {
        matches!(self, ActivationStrategy::FollowPromptOnWatch)
    }
}

impl std::fmt::Display for ActivationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivationStrategy::NoActionNeeded => "no_action_needed",
            ActivationStrategy::CallSetActiveNoUserAction => "call_set_active_no_user_action",
            ActivationStrategy::FollowPromptOnWatch => "follow_prompt_on_watch",
            ActivationStrategy::LongPressToSet => "long_press_to_set",
            ActivationStrategy::GoToWatchSettings => "go_to_watch_settings",
        };
        f.write_str(name)
    }
}
