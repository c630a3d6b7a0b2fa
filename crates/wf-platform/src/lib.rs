//! # wf-platform
//!
//! Platform adapters for the watch face transfer pipeline.
//!
//! The wearable data layer, the watch face push service and the runtime
//! permission live outside this process on real devices. The adapters here
//! provide in-process versions of them so both sides of a transfer can run
//! in one runtime.

pub mod adapters;

pub use adapters::{
    LinkState, LoopbackEndpoint, LoopbackNetwork, SimulatedPermission, SimulatedWatchFacePush,
    StaticRemoteConfig,
};
