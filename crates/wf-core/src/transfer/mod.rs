//! Transfer lifecycle domain.
//!
//! Defines the persisted installation status and the error taxonomy shared
//! by the sending phone and the receiving watch.

mod completed;
mod error;
mod status;

pub use completed::{CompletedTransfer, CompletedTransferError};
pub use error::{InstallError, TransferFailure};
pub use status::InstallationStatus;
