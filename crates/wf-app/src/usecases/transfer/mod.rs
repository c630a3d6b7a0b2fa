//! Transfer use cases.
//!
//! ```text
//! phone: TransferSender ──/initiate_transfer──▶ watch: TransferReceiver
//!        (Sending)       ══ package bytes ════▶        install_or_update
//!                                                       ActivationCoordinator
//!        (Complete)   ◀──/finalize_transfer/{id}──      (Receiving | Complete)
//! ```

pub mod activation;
pub mod receiver;
pub mod sender;
pub mod status_control;
#[cfg(test)]
pub(crate) mod test_support;

pub use activation::ActivationCoordinator;
pub use receiver::TransferReceiver;
pub use sender::{TransferOutcome, TransferSender};
pub use status_control::InstallationStatusControl;
