//! Watch face transfer application layer
//!
//! This crate contains the use cases that drive one transfer attempt on each
//! side of the phone ↔ watch link, plus the inbound routers that feed
//! transport events into them.

pub mod inbound;
pub mod usecases;

pub use inbound::{PhoneInboundHandler, WatchInboundHandler};
pub use usecases::transfer::{
    ActivationCoordinator, InstallationStatusControl, TransferOutcome, TransferReceiver,
    TransferSender,
};
pub use usecases::{FeatureGate, ListConnectedWatches};
