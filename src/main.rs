//! Runs one phone → watch transfer over the in-process transport.
//!
//! ```text
//! watchface-transfer [CONFIG.toml] [PACKAGE]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{error, info, warn};
use watchface_transfer_lib::bootstrap::resolve_data_dir;
use watchface_transfer_lib::{init_tracing_subscriber, load_config_or_default, wire_phone, wire_watch};
use wf_core::{InstallationStatus, NodeId};
use wf_platform::{LoopbackNetwork, SimulatedPermission};

const DEMO_PACKAGE: &[u8] = b"PK\x03\x04androidify-demo-watchface";
const ACK_WAIT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config_path = args.next();
    let package_path = args.next();

    let config = load_config_or_default(config_path.as_deref())?;
    init_tracing_subscriber(&config)?;

    let package = match &package_path {
        Some(path) => Bytes::from(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read package: {}", path.display()))?,
        ),
        None => Bytes::from_static(DEMO_PACKAGE),
    };

    let data_dir = resolve_data_dir(&config)?;
    info!(data_dir = %data_dir.display(), "starting watch face transfer");

    let network = LoopbackNetwork::new();
    let phone = wire_phone(&config, &network, NodeId::from("phone"), &data_dir);
    let watch = wire_watch(
        &config,
        &network,
        NodeId::from("watch"),
        &data_dir,
        SimulatedPermission::default(),
        1,
    );

    let watches = phone.watches.execute().await?;
    let Some(target) = watches.first() else {
        warn!("no watch with the companion app is connected");
        return Ok(());
    };
    info!(watch = %target.display_name, "sending watch face");

    let outcome = phone
        .sender
        .initiate_transfer(&target.node_id, package.clone(), package.len() as u64)
        .await;
    if !outcome.is_success() {
        error!(install_error = %outcome.install_error, "transfer failed");
        return Ok(());
    }

    match outcome.activation_strategy {
        Some(strategy) if strategy.requires_user_follow_up() => {
            info!(activation_strategy = %strategy, "accepting the permission prompt on the watch");
            let mut phone_status = phone.sender.observe_status().await?;
            watch.permission.grant();
            watch.receiver.on_permission_result(true).await?;

            let acknowledged = tokio::time::timeout(ACK_WAIT, async {
                while let Some(status) = phone_status.next().await {
                    if let InstallationStatus::Complete(done) = status {
                        if !done.activation_strategy().requires_user_follow_up() {
                            return Some(done.activation_strategy());
                        }
                    }
                }
                None
            })
            .await;
            match acknowledged {
                Ok(Some(strategy)) => info!(activation_strategy = %strategy, "transfer complete"),
                Ok(None) | Err(_) => warn!("watch did not confirm activation"),
            }
        }
        Some(strategy) => info!(activation_strategy = %strategy, "transfer complete"),
        None => {}
    }

    phone.sender.acknowledge_completion().await?;
    watch.receiver.acknowledge_completion().await?;
    Ok(())
}
