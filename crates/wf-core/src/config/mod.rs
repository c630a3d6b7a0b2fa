//! Configuration domain models.

mod app_config;

pub use app_config::{
    AppConfig, ConfigError, FeatureConfig, StorageConfig, TransferConfig, TransferSection, WatchFaceConfig,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WATCH_FACE_PACKAGE,
};
