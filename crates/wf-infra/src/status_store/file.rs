//! File-based installation status repository
//!
//! Persists the single current [`InstallationStatus`] as a versioned JSON
//! envelope in the application data directory. Each write goes to a
//! temporary file that is synced and renamed over the previous one.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};
use wf_core::ports::{InstallationStatusPort, StatusStream};
use wf_core::InstallationStatus;

use super::{PersistedStatus, StatusCell, StatusStoreError, CURRENT_SCHEMA_VERSION};

pub const DEFAULT_INSTALLATION_STATUS_FILE: &str = ".installation_status";

pub struct FileInstallationStatusStore {
    status_file_path: PathBuf,
    cell: StatusCell,
    loaded: OnceCell<()>,
    write_lock: Mutex<()>,
}

impl FileInstallationStatusStore {
    /// Create repository with custom file path
    pub fn new(status_file_path: PathBuf) -> Self {
        Self {
            status_file_path,
            cell: StatusCell::new(InstallationStatus::Unknown),
            loaded: OnceCell::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create repository with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_INSTALLATION_STATUS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.status_file_path
    }

    /// Value held before the first access. `Unknown` until loaded.
    pub fn peek(&self) -> InstallationStatus {
        self.cell.get()
    }

    /// Reads the file without recovery, surfacing corruption to the caller.
    ///
    /// Missing or empty file reads as `NotStarted`; a `Sending` left behind
    /// by a dead process reads as `NotStarted` too.
    pub async fn read_persisted(&self) -> Result<InstallationStatus, StatusStoreError> {
        let content = match fs::read_to_string(&self.status_file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(InstallationStatus::NotStarted)
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(InstallationStatus::NotStarted);
        }

        let persisted: PersistedStatus =
            serde_json::from_str(&content).map_err(|e| StatusStoreError::Corrupt {
                path: self.status_file_path.clone(),
                reason: e.to_string(),
            })?;

        if persisted.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(StatusStoreError::UnsupportedSchema {
                path: self.status_file_path.clone(),
                version: persisted.schema_version,
            });
        }

        Ok(match persisted.status {
            InstallationStatus::Sending | InstallationStatus::Unknown => {
                debug!(
                    path = %self.status_file_path.display(),
                    "discarding transient status left by a previous process"
                );
                InstallationStatus::NotStarted
            }
            status @ (InstallationStatus::NotStarted
            | InstallationStatus::Receiving { .. }
            | InstallationStatus::Complete(_)) => status,
        })
    }

    async fn ensure_loaded(&self) -> anyhow::Result<()> {
        self.loaded
            .get_or_try_init(|| async {
                let status = match self.read_persisted().await {
                    Ok(status) => status,
                    Err(e) if e.is_recoverable() => {
                        warn!(error = %e, "installation status corrupt, resetting to not_started");
                        InstallationStatus::NotStarted
                    }
                    Err(e) => return Err(anyhow::Error::from(e)),
                };
                let _guard = self.write_lock.lock().await;
                self.persist(&status).await?;
                self.cell.publish(status);
                Ok::<(), anyhow::Error>(())
            })
            .await
            .map(|_| ())
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.status_file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create status dir failed: {}", parent.display()))?;
        }
        Ok(())
    }

    async fn persist(&self, status: &InstallationStatus) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let envelope = PersistedStatus {
            schema_version: CURRENT_SCHEMA_VERSION,
            status: status.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| anyhow::anyhow!("Failed to serialize installation status: {e}"))?;

        let tmp_path = self.status_file_path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create status file: {e}"))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write status file: {e}"))?;
        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync status file: {e}"))?;
        drop(file);

        fs::rename(&tmp_path, &self.status_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to replace status file: {e}"))?;
        Ok(())
    }
}

#[async_trait]
impl InstallationStatusPort for FileInstallationStatusStore {
    async fn read(&self) -> anyhow::Result<InstallationStatus> {
        self.ensure_loaded().await?;
        Ok(self.cell.get())
    }

    async fn write(&self, status: &InstallationStatus) -> anyhow::Result<()> {
        if matches!(status, InstallationStatus::Unknown) {
            return Err(StatusStoreError::UnknownNotWritable.into());
        }
        self.ensure_loaded().await?;

        let _guard = self.write_lock.lock().await;
        self.persist(status).await?;
        self.cell.publish(status.clone());
        debug!(status = ?status, "installation status written");
        Ok(())
    }

    async fn observe(&self) -> anyhow::Result<StatusStream> {
        self.ensure_loaded().await?;
        Ok(self.cell.subscribe())
    }
}
