use std::sync::Arc;

use tracing::info;
use wf_core::ports::{InstallationStatusPort, StatusStream};
use wf_core::InstallationStatus;

/// User-facing controls over the installation status: explicit reset,
/// acknowledging a finished attempt, observing progress.
pub struct InstallationStatusControl {
    status: Arc<dyn InstallationStatusPort>,
}

impl InstallationStatusControl {
    pub fn new(status: Arc<dyn InstallationStatusPort>) -> Self {
        Self { status }
    }

    /// Unconditional reset to `NotStarted`.
    pub async fn reset(&self) -> anyhow::Result<()> {
        let current = self.status.read().await?;
        let next = current.clone().reset();
        self.status.write(&next).await?;
        info!(from = ?current, "installation status reset");
        Ok(())
    }

    /// Resets only a `Complete` status. Returns whether anything changed.
    pub async fn acknowledge_completion(&self) -> anyhow::Result<bool> {
        match self.status.read().await? {
            done @ InstallationStatus::Complete(_) => {
                self.status.write(&done.reset()).await?;
                Ok(true)
            }
            InstallationStatus::Unknown
            | InstallationStatus::NotStarted
            | InstallationStatus::Receiving { .. }
            | InstallationStatus::Sending => Ok(false),
        }
    }

    pub async fn current(&self) -> anyhow::Result<InstallationStatus> {
        self.status.read().await
    }

    pub async fn observe(&self) -> anyhow::Result<StatusStream> {
        self.status.observe().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::{ActivationStrategy, CompletedTransfer, NodeId, TransferId, ValidationToken};
    use wf_infra::InMemoryInstallationStatusStore;

    fn complete() -> InstallationStatus {
        InstallationStatus::Complete(CompletedTransfer::succeeded(
            NodeId::from("watch"),
            TransferId::from("t-1"),
            Some(ValidationToken::from("token")),
            ActivationStrategy::NoActionNeeded,
        ))
    }

    fn receiving() -> InstallationStatus {
        InstallationStatus::Receiving {
            other_node_id: NodeId::from("phone"),
            transfer_id: TransferId::from("t-1"),
            validation_token: ValidationToken::from("token"),
            activation_strategy: ActivationStrategy::FollowPromptOnWatch,
        }
    }

    #[tokio::test]
    async fn reset_yields_not_started_from_any_status() {
        for status in [complete(), receiving(), InstallationStatus::Sending] {
            let store = Arc::new(InMemoryInstallationStatusStore::with_status(status));
            let control = InstallationStatusControl::new(store.clone());

            control.reset().await.unwrap();
            assert_eq!(store.read().await.unwrap(), InstallationStatus::NotStarted);
        }
    }

    #[tokio::test]
    async fn acknowledge_only_clears_complete() {
        let store = Arc::new(InMemoryInstallationStatusStore::with_status(complete()));
        let control = InstallationStatusControl::new(store.clone());
        assert!(control.acknowledge_completion().await.unwrap());
        assert_eq!(control.current().await.unwrap(), InstallationStatus::NotStarted);

        let store = Arc::new(InMemoryInstallationStatusStore::with_status(receiving()));
        let control = InstallationStatusControl::new(store.clone());
        assert!(!control.acknowledge_completion().await.unwrap());
        assert_eq!(control.current().await.unwrap(), receiving());
    }
}
