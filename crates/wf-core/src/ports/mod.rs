//! Port interfaces for the application layer
//!
//! Ports define the contract between the transfer use cases and the
//! infrastructure or platform implementations behind them. The pipeline
//! only ever talks to the wearable transport, the watch face install
//! service and durable storage through these traits.

mod activation_permission;
mod message_channel;
mod node_discovery;
mod one_shot;
mod package_validation;
mod remote_config;
mod status_store;
pub mod watch_face_push;

pub use activation_permission::ActivationPermissionPort;
pub use message_channel::{InboundHandlerPort, MessageChannelPort};
pub use node_discovery::{ConnectedNode, NodeDiscoveryPort};
pub use one_shot::OneShotFlagPort;
pub use package_validation::PackageValidationPort;
pub use remote_config::RemoteConfigPort;
pub use status_store::{InstallationStatusPort, StatusStream};
pub use watch_face_push::{SlotId, WatchFacePushError, WatchFacePushPort, WatchFaceSlot, WatchFaceSlots};
