//! Business logic use cases
//!
//! Phone side: [`ListConnectedWatches`] → [`FeatureGate`] →
//! [`transfer::TransferSender`].
//! Watch side: [`transfer::TransferReceiver`] → [`transfer::ActivationCoordinator`].

pub mod feature_gate;
pub mod list_connected_watches;
pub mod transfer;

pub use feature_gate::FeatureGate;
pub use list_connected_watches::ListConnectedWatches;
