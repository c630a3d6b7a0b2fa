//! Installation status stores.
//!
//! Both stores keep the current value in a [`StatusCell`], which fans every
//! write out to the live subscribers in write order.

mod file;
mod memory;

pub use file::{FileInstallationStatusStore, DEFAULT_INSTALLATION_STATUS_FILE};
pub use memory::InMemoryInstallationStatusStore;

use std::path::PathBuf;
use std::sync::Mutex;

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use wf_core::ports::StatusStream;
use wf_core::InstallationStatus;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StatusStoreError {
    #[error("status file io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("status file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("status file {path} has unsupported schema version {version}")]
    UnsupportedSchema { path: PathBuf, version: u32 },

    #[error("`unknown` is an initialization marker and cannot be stored")]
    UnknownNotWritable,
}

impl StatusStoreError {
    /// Errors a store recovers from by resetting to `NotStarted`.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StatusStoreError::Corrupt { .. } | StatusStoreError::UnsupportedSchema { .. }
        )
    }
}

/// On-disk envelope.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct PersistedStatus {
    pub schema_version: u32,
    pub status: InstallationStatus,
}

/// Current value plus subscriber fan-out.
pub(crate) struct StatusCell {
    inner: Mutex<CellInner>,
}

struct CellInner {
    current: InstallationStatus,
    subscribers: Vec<mpsc::UnboundedSender<InstallationStatus>>,
}

impl StatusCell {
    pub fn new(initial: InstallationStatus) -> Self {
        Self {
            inner: Mutex::new(CellInner {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn get(&self) -> InstallationStatus {
        self.lock().current.clone()
    }

    /// Stores `status` and delivers it to every subscriber, dropping the
    /// ones whose stream was dropped.
    pub fn publish(&self, status: InstallationStatus) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(status.clone()).is_ok());
        inner.current = status;
    }

    pub fn subscribe(&self) -> StatusStream {
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut inner = self.lock();
            // Cannot fail: the receiver is still in scope.
            let _ = tx.send(inner.current.clone());
            inner.subscribers.push(tx);
        }
        futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|status| (status, rx))
        })
        .boxed()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CellInner> {
        // A poisoned lock only means a subscriber panicked mid-send; the value is intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
