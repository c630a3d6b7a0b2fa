use crate::ids::TransferId;

pub const FINALIZE_TRANSFER_PREFIX: &str = "/finalize_transfer/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePath {
    InitiateTransfer,
    FinalizeTransfer,
}

impl MessagePath {
    /// Wire path of the message. For `FinalizeTransfer` this is only the
    /// prefix; the real path is built with [`finalize_path`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessagePath::InitiateTransfer => "/initiate_transfer",
            MessagePath::FinalizeTransfer => FINALIZE_TRANSFER_PREFIX,
        }
    }

    /// Classifies an inbound path. Finalize paths carry a transfer id suffix.
    pub fn classify(path: &str) -> Option<MessagePath> {
        if path == MessagePath::InitiateTransfer.as_str() {
            Some(MessagePath::InitiateTransfer)
        } else if parse_finalize_path(path).is_some() {
            Some(MessagePath::FinalizeTransfer)
        } else {
            None
        }
    }
}

pub fn finalize_path(transfer_id: &TransferId) -> String {
    format!("{FINALIZE_TRANSFER_PREFIX}{transfer_id}")
}

pub fn parse_finalize_path(path: &str) -> Option<TransferId> {
    path.strip_prefix(FINALIZE_TRANSFER_PREFIX)
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .map(TransferId::from)
}
