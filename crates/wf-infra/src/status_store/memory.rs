use async_trait::async_trait;
use wf_core::ports::{InstallationStatusPort, StatusStream};
use wf_core::InstallationStatus;

use super::{StatusCell, StatusStoreError};

/// Non-durable status store.
///
/// Used on the phone, where `Sending` is transient and nothing has to
/// survive a restart, and in tests.
pub struct InMemoryInstallationStatusStore {
    cell: StatusCell,
}

impl InMemoryInstallationStatusStore {
    pub fn new() -> Self {
        Self::with_status(InstallationStatus::NotStarted)
    }

    pub fn with_status(status: InstallationStatus) -> Self {
        Self {
            cell: StatusCell::new(status),
        }
    }
}

impl Default for InMemoryInstallationStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstallationStatusPort for InMemoryInstallationStatusStore {
    async fn read(&self) -> anyhow::Result<InstallationStatus> {
        Ok(self.cell.get())
    }

    async fn write(&self, status: &InstallationStatus) -> anyhow::Result<()> {
        if matches!(status, InstallationStatus::Unknown) {
            return Err(StatusStoreError::UnknownNotWritable.into());
        }
        self.cell.publish(status.clone());
        Ok(())
    }

    async fn observe(&self) -> anyhow::Result<StatusStream> {
        Ok(self.cell.subscribe())
    }
}
