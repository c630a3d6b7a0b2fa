use std::sync::Arc;

use tracing::warn;
use wf_core::config::FeatureConfig;
use wf_core::ports::RemoteConfigPort;

/// Decides whether the watch face feature is available on this phone.
///
/// `force_enable || (device_supported && remote flag)`. The remote flag is
/// read on every call.
pub struct FeatureGate {
    device_supported: bool,
    force_enable: bool,
    remote_config: Arc<dyn RemoteConfigPort>,
}

impl FeatureGate {
    pub fn new(
        device_supported: bool,
        force_enable: bool,
        remote_config: Arc<dyn RemoteConfigPort>,
    ) -> Self {
        Self {
            device_supported,
            force_enable,
            remote_config,
        }
    }

    pub fn from_config(config: &FeatureConfig, remote_config: Arc<dyn RemoteConfigPort>) -> Self {
        Self::new(
            config.device_supported,
            config.force_enable_watch_faces,
            remote_config,
        )
    }

    pub async fn is_enabled(&self) -> bool {
        if self.force_enable {
            return true;
        }
        if !self.device_supported {
            return false;
        }
        match self.remote_config.watch_faces_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(error = %e, "remote config unavailable, watch faces disabled");
                false
            }
        }
    }
}
