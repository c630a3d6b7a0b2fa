use serde::{Deserialize, Serialize};

use super::CompletedTransfer;
use crate::activation::ActivationStrategy;
use crate::ids::{NodeId, TransferId, ValidationToken};

/// Current stage of the transfer/install lifecycle.
///
/// Persisted as an internally tagged union (`"type"` field). Consumers match
/// exhaustively so a new stage cannot be silently ignored.
///
/// 传输/安装生命周期的当前阶段。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstallationStatus {
    /// Store not initialized yet. Never re-entered once a value was loaded.
    Unknown,
    #[default]
    NotStarted,
    /// Watch accepted a transfer and is installing or waiting for the user.
    Receiving {
        other_node_id: NodeId,
        transfer_id: TransferId,
        validation_token: ValidationToken,
        activation_strategy: ActivationStrategy,
    },
    /// Phone is driving an attempt. Not meaningful after a restart.
    Sending,
    Complete(CompletedTransfer),
}

impl InstallationStatus {
    /// Reset always lands on `NotStarted`, whatever the current stage.
    pub fn reset(self) -> InstallationStatus {
        InstallationStatus::NotStarted
    }

    pub fn transfer_id(&self) -> Option<&TransferId> {
        match self {
            InstallationStatus::Receiving { transfer_id, .. } => Some(transfer_id),
            InstallationStatus::Complete(done) => Some(done.transfer_id()),
            InstallationStatus::Unknown
            | InstallationStatus::NotStarted
            | InstallationStatus::Sending => None,
        }
    }

    pub fn other_node_id(&self) -> Option<&NodeId> {
        match self {
            InstallationStatus::Receiving { other_node_id, .. } => Some(other_node_id),
            InstallationStatus::Complete(done) => Some(done.other_node_id()),
            InstallationStatus::Unknown
            | InstallationStatus::NotStarted
            | InstallationStatus::Sending => None,
        }
    }

    /// `true` for stages no protocol step will move forward on its own.
    pub fn is_terminal(&self) -> bool {
        match self {
            InstallationStatus::NotStarted | InstallationStatus::Complete(_) => true,
            InstallationStatus::Unknown
            | InstallationStatus::Receiving { .. }
            | InstallationStatus::Sending => false,
        }
    }

    /// Whether this status belongs to `transfer_id`. Used to drop stale
    /// responses instead of locking.
    pub fn is_for_transfer(&self, transfer_id: &TransferId) -> bool {
        self.transfer_id() == Some(transfer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferFailure;

    fn all_variants() -> Vec<InstallationStatus> {
        let node = NodeId::from("node-a");
        let transfer = TransferId::from("6f0c8d3e-transfer");
        let token = ValidationToken::from("c2lnbmVkLXRva2Vu");
        vec![
            InstallationStatus::Unknown,
            InstallationStatus::NotStarted,
            InstallationStatus::Receiving {
                other_node_id: node.clone(),
                transfer_id: transfer.clone(),
                validation_token: token.clone(),
                activation_strategy: ActivationStrategy::FollowPromptOnWatch,
            },
            InstallationStatus::Sending,
            InstallationStatus::Complete(CompletedTransfer::succeeded(
                node.clone(),
                transfer.clone(),
                Some(token.clone()),
                ActivationStrategy::LongPressToSet,
            )),
            InstallationStatus::Complete(CompletedTransfer::failed(
                node,
                transfer,
                None,
                TransferFailure::SendSetupTimeout,
            )),
        ]
    }

    #[test]
    fn every_variant_survives_json_encoding() {
        for status in all_variants() {
            let json = serde_json::to_string(&status).unwrap();
            let decoded: InstallationStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, status, "json was {json}");
        }
    }

    #[test]
    fn reset_always_yields_not_started() {
        for status in all_variants() {
            assert_eq!(status.reset(), InstallationStatus::NotStarted);
        }
    }

    #[test]
    fn default_is_not_started() {
        assert_eq!(InstallationStatus::default(), InstallationStatus::NotStarted);
    }

    #[test]
    fn encoding_is_tagged_by_type() {
        let json = serde_json::to_value(InstallationStatus::Sending).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "sending" }));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let parsed: Result<InstallationStatus, _> =
            serde_json::from_str(r#"{ "type": "paused" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn transfer_id_only_for_attempt_stages() {
        let statuses = all_variants();
        let with_ids: Vec<_> = statuses.iter().filter_map(|s| s.transfer_id()).collect();
        assert_eq!(with_ids.len(), 3);
        assert!(statuses[2].is_for_transfer(&TransferId::from("6f0c8d3e-transfer")));
        assert!(!statuses[2].is_for_transfer(&TransferId::from("other")));
    }
}
