//! Application configuration domain model
//!
//! Mirrors the TOML file one section per struct. Every field has a default,
//! so a partial or empty file still yields a usable configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_WATCH_FACE_PACKAGE: &str = "com.android.developers.androidify.watchface";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub transfer: TransferSection,
    pub watch_face: WatchFaceConfig,
    pub feature: FeatureConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl AppConfig {
    /// Maps TOML text onto the config. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// `[transfer]` section, raw values as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSection {
    pub setup_timeout_secs: u64,
    pub transfer_timeout_secs: u64,
}

impl Default for TransferSection {
    fn default() -> Self {
        Self {
            setup_timeout_secs: DEFAULT_TIMEOUT_SECS,
            transfer_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[watch_face]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchFaceConfig {
    /// Package name of the pushed watch face, used for the "is active" query.
    pub package_name: String,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_WATCH_FACE_PACKAGE.to_string(),
        }
    }
}

/// `[feature]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Device runs a platform version with the watch face push service.
    pub device_supported: bool,
    /// Bypass both the platform check and the remote flag. Debug builds only.
    pub force_enable_watch_faces: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            device_supported: true,
            force_enable_watch_faces: false,
        }
    }
}

/// `[storage]` section. `None` means "use the platform data dir".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// Timeouts used by the transfer use cases.
///
/// 传输超时配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Wait for the watch to answer the setup request.
    pub setup_timeout: Duration,
    /// Wait for the install response after streaming the package.
    pub transfer_timeout: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl TransferConfig {
    /// Zero timeouts are clamped to one second.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            setup_timeout: Duration::from_secs(config.transfer.setup_timeout_secs.max(1)),
            transfer_timeout: Duration::from_secs(config.transfer.transfer_timeout_secs.max(1)),
        }
    }
}
