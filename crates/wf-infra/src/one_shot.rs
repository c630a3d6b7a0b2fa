//! File-based guard for the one-shot "set active" platform API.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};
use wf_core::ports::OneShotFlagPort;

pub const DEFAULT_ONE_SHOT_FLAG_FILE: &str = ".one_shot_set_active";

#[derive(Debug, Default, Serialize, Deserialize)]
struct OneShotFlag {
    has_used_one_shot_api: bool,
}

pub struct FileOneShotFlagStore {
    flag_file_path: PathBuf,
    /// Cached flag; `None` until first read. Held across check-and-set.
    state: Mutex<Option<bool>>,
}

impl FileOneShotFlagStore {
    pub fn new(flag_file_path: PathBuf) -> Self {
        Self {
            flag_file_path,
            state: Mutex::new(None),
        }
    }

    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_ONE_SHOT_FLAG_FILE))
    }

    /// An unreadable flag counts as used: the API must never run twice.
    async fn load(&self) -> anyhow::Result<bool> {
        let content = match fs::read_to_string(&self.flag_file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(false);
        }
        match serde_json::from_str::<OneShotFlag>(&content) {
            Ok(flag) => Ok(flag.has_used_one_shot_api),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.flag_file_path.display(),
                    "one-shot flag file corrupt, treating the API as used"
                );
                Ok(true)
            }
        }
    }

    async fn persist_used(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.flag_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&OneShotFlag {
            has_used_one_shot_api: true,
        })?;
        let mut file = fs::File::create(&self.flag_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create one-shot flag file: {e}"))?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync one-shot flag file: {e}"))?;
        Ok(())
    }
}

#[async_trait]
impl OneShotFlagPort for FileOneShotFlagStore {
    async fn has_been_used(&self) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        if let Some(used) = *state {
            return Ok(used);
        }
        let used = self.load().await?;
        *state = Some(used);
        Ok(used)
    }

    async fn try_consume(&self) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        let used = match *state {
            Some(used) => used,
            None => self.load().await?,
        };
        if used {
            *state = Some(true);
            return Ok(false);
        }

        self.persist_used().await?;
        *state = Some(true);
        info!("one-shot set-active flag consumed");
        Ok(true)
    }
}
