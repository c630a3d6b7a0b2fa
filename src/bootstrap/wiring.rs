//! # Dependency Injection / 依赖注入模块
//!
//! Builds the phone and the watch runtimes from concrete adapters. This is
//! the only place that depends on `wf-infra`, `wf-platform` and `wf-app`
//! together. Assembly only: no decisions about transfers are made here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use wf_app::{
    ActivationCoordinator, FeatureGate, ListConnectedWatches, PhoneInboundHandler,
    TransferReceiver, TransferSender, WatchInboundHandler,
};
use wf_core::config::AppConfig;
use wf_core::ports::InboundHandlerPort;
use wf_core::{NodeId, TransferConfig};
use wf_infra::{FileInstallationStatusStore, FileOneShotFlagStore, Sha256PackageValidator};
use wf_platform::{
    LoopbackEndpoint, LoopbackNetwork, SimulatedPermission, SimulatedWatchFacePush,
    StaticRemoteConfig,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Phone side: sends watch faces.
pub struct PhoneRuntime {
    pub node_id: NodeId,
    pub sender: Arc<TransferSender>,
    pub watches: ListConnectedWatches,
    pub remote_config: Arc<StaticRemoteConfig>,
    _handler: Arc<dyn InboundHandlerPort>,
}

/// Watch side: receives, installs and activates watch faces.
pub struct WatchRuntime {
    pub node_id: NodeId,
    pub receiver: Arc<TransferReceiver>,
    pub push: Arc<SimulatedWatchFacePush>,
    pub permission: Arc<SimulatedPermission>,
    _handler: Arc<dyn InboundHandlerPort>,
}

/// Configured data dir, or the platform default.
pub fn resolve_data_dir(config: &AppConfig) -> WiringResult<PathBuf> {
    match &config.storage.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => wf_infra::fs::app_data_dir().map_err(|e| WiringError::DataDir(e.to_string())),
    }
}

pub fn wire_phone(
    config: &AppConfig,
    network: &Arc<LoopbackNetwork>,
    node_id: NodeId,
    data_dir: &Path,
) -> PhoneRuntime {
    let endpoint: Arc<LoopbackEndpoint> =
        Arc::new(network.join(node_id.clone(), "Phone", false));
    // Remote flag mirrors the device flag until a real remote source exists.
    let remote_config = Arc::new(StaticRemoteConfig::new(config.feature.device_supported));

    let sender = Arc::new(TransferSender::new(
        TransferConfig::from_app_config(config),
        endpoint.clone(),
        ListConnectedWatches::new(endpoint.clone()),
        Arc::new(Sha256PackageValidator::new()),
        Arc::new(FileInstallationStatusStore::with_defaults(
            data_dir.join("phone"),
        )),
        Arc::new(FeatureGate::from_config(&config.feature, remote_config.clone())),
    ));

    let handler: Arc<dyn InboundHandlerPort> = Arc::new(PhoneInboundHandler::new(sender.clone()));
    network.register_handler(&node_id, &handler);
    info!(node_id = %node_id, "phone runtime wired");

    PhoneRuntime {
        node_id,
        sender,
        watches: ListConnectedWatches::new(endpoint),
        remote_config,
        _handler: handler,
    }
}

pub fn wire_watch(
    config: &AppConfig,
    network: &Arc<LoopbackNetwork>,
    node_id: NodeId,
    data_dir: &Path,
    permission: SimulatedPermission,
    slot_count: u32,
) -> WatchRuntime {
    let endpoint = Arc::new(network.join(node_id.clone(), "Watch", true));
    let watch_dir = data_dir.join("watch");
    let package_name = config.watch_face.package_name.clone();

    let push = Arc::new(SimulatedWatchFacePush::new(package_name.clone(), slot_count));
    let permission = Arc::new(permission);
    let activation = ActivationCoordinator::new(
        push.clone(),
        permission.clone(),
        Arc::new(FileOneShotFlagStore::with_defaults(watch_dir.clone())),
        package_name,
    );
    let receiver = Arc::new(TransferReceiver::new(
        endpoint,
        push.clone(),
        Arc::new(FileInstallationStatusStore::with_defaults(watch_dir)),
        activation,
    ));

    let handler: Arc<dyn InboundHandlerPort> =
        Arc::new(WatchInboundHandler::new(receiver.clone()));
    network.register_handler(&node_id, &handler);
    info!(node_id = %node_id, slot_count, "watch runtime wired");

    WatchRuntime {
        node_id,
        receiver,
        push,
        permission,
        _handler: handler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tempfile::TempDir;
    use wf_core::{ActivationStrategy, InstallError};

    #[test]
    fn configured_data_dir_is_used() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/data/androidify"));
        assert_eq!(
            resolve_data_dir(&config).unwrap(),
            PathBuf::from("/data/androidify")
        );
    }

    #[tokio::test]
    async fn wired_runtimes_complete_a_transfer() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let network = LoopbackNetwork::new();
        let phone = wire_phone(&config, &network, NodeId::from("phone"), dir.path());
        let watch = wire_watch(
            &config,
            &network,
            NodeId::from("watch"),
            dir.path(),
            SimulatedPermission::new(true, true),
            1,
        );

        let connected = phone.watches.execute().await.unwrap();
        assert_eq!(connected.len(), 1);

        let package = Bytes::from_static(b"watch face bundle");
        let outcome = phone
            .sender
            .initiate_transfer(&watch.node_id, package.clone(), package.len() as u64)
            .await;

        assert_eq!(outcome.install_error, InstallError::NoError);
        assert_eq!(
            outcome.activation_strategy,
            Some(ActivationStrategy::NoActionNeeded)
        );
        assert!(dir.path().join("watch/.installation_status").exists());
        assert!(dir.path().join("watch/.one_shot_set_active").exists());
        assert!(dir.path().join("phone/.installation_status").exists());
    }

    #[tokio::test]
    async fn disabled_remote_flag_blocks_transfer() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let network = LoopbackNetwork::new();
        let phone = wire_phone(&config, &network, NodeId::from("phone"), dir.path());
        let watch = wire_watch(
            &config,
            &network,
            NodeId::from("watch"),
            dir.path(),
            SimulatedPermission::default(),
            1,
        );
        phone.remote_config.set_watch_faces_enabled(false);

        let outcome = phone
            .sender
            .initiate_transfer(&watch.node_id, Bytes::from_static(b"face"), 4)
            .await;

        assert_eq!(outcome.install_error, InstallError::WatchNotReady);
    }
}
