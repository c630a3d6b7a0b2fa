//! # wf-core
//!
//! Core domain models and protocol for the watch face transfer pipeline.
//!
//! This crate contains pure business logic without any infrastructure
//! dependencies: the activation strategy resolver, the persisted
//! installation status, the phone ↔ watch wire messages and the ports the
//! use cases are written against.

pub mod activation;
pub mod config;
pub mod ids;
pub mod ports;
pub mod protocol;
pub mod transfer;

// Re-export commonly used types at the crate root
pub use activation::{ActivationState, ActivationStrategy};
pub use config::{AppConfig, TransferConfig};
pub use ids::{NodeId, TransferId, ValidationToken};
pub use transfer::{CompletedTransfer, InstallError, InstallationStatus, TransferFailure};
