//! # Platform Adapters / 平台适配器
//!
//! - `loopback` - In-process wearable transport and node discovery
//! - `watch_face_push` - Simulated watch face install service
//! - `permission` - Simulated set-active permission
//! - `remote_config` - Static remote feature flag

pub mod loopback;
pub mod permission;
pub mod remote_config;
pub mod watch_face_push;

pub use loopback::{LinkState, LoopbackEndpoint, LoopbackNetwork};
pub use permission::SimulatedPermission;
pub use remote_config::StaticRemoteConfig;
pub use watch_face_push::SimulatedWatchFacePush;
