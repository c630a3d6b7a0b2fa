//! Phone ↔ watch transfer protocol.
//!
//! ```text
//! phone                                   watch
//!   | -- /initiate_transfer (InitialRequest) -> |
//!   | <------------- bool proceed ------------- |
//!   | == package bytes (keyed by transfer id) => |
//!   | <- /finalize_transfer/{id} (InstallResponse) |
//! ```

mod codec;
mod messages;
mod paths;

pub use codec::ProtocolError;
pub use messages::{InitialRequest, InstallResponse, SetupReply};
pub use paths::{finalize_path, parse_finalize_path, MessagePath, FINALIZE_TRANSFER_PREFIX};
