//! Terminal record of one transfer attempt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InstallError, TransferFailure};
use crate::activation::ActivationStrategy;
use crate::ids::{NodeId, TransferId, ValidationToken};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompletedTransferError {
    #[error("completed transfer marked success={success} with install error {install_error}")]
    InconsistentOutcome {
        success: bool,
        install_error: InstallError,
    },
}

/// Outcome of a finished transfer attempt.
///
/// `success` and `install_error` are kept consistent by construction:
/// `install_error == NoError` iff `success`. Values can only be built through
/// [`CompletedTransfer::succeeded`], [`CompletedTransfer::failed`] or the
/// checked [`CompletedTransfer::from_outcome`]; deserialization goes through
/// the same check.
///
/// 传输完成记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCompletedTransfer")]
pub struct CompletedTransfer {
    success: bool,
    other_node_id: NodeId,
    transfer_id: TransferId,
    /// Absent when the attempt failed before a token was issued.
    validation_token: Option<ValidationToken>,
    activation_strategy: ActivationStrategy,
    install_error: InstallError,
}

#[derive(Deserialize)]
struct RawCompletedTransfer {
    success: bool,
    other_node_id: NodeId,
    transfer_id: TransferId,
    validation_token: Option<ValidationToken>,
    activation_strategy: ActivationStrategy,
    install_error: InstallError,
}

impl TryFrom<RawCompletedTransfer> for CompletedTransfer {
    type Error = CompletedTransferError;

    fn try_from(raw: RawCompletedTransfer) -> Result<Self, Self::Error> {
        Self::from_outcome(
            raw.success,
            raw.other_node_id,
            raw.transfer_id,
            raw.validation_token,
            raw.activation_strategy,
            raw.install_error,
        )
    }
}

impl CompletedTransfer {
    pub fn succeeded(
        other_node_id: NodeId,
        transfer_id: TransferId,
        validation_token: Option<ValidationToken>,
        activation_strategy: ActivationStrategy,
    ) -> Self {
        Self {
            success: true,
            other_node_id,
            transfer_id,
            validation_token,
            activation_strategy,
            install_error: InstallError::NoError,
        }
    }

    /// A failed attempt. The activation strategy is meaningless for a
    /// failure and recorded as `NoActionNeeded`.
    pub fn failed(
        other_node_id: NodeId,
        transfer_id: TransferId,
        validation_token: Option<ValidationToken>,
        failure: TransferFailure,
    ) -> Self {
        Self {
            success: false,
            other_node_id,
            transfer_id,
            validation_token,
            activation_strategy: ActivationStrategy::NoActionNeeded,
            install_error: failure.into(),
        }
    }

    pub fn from_outcome(
        success: bool,
        other_node_id: NodeId,
        transfer_id: TransferId,
        validation_token: Option<ValidationToken>,
        activation_strategy: ActivationStrategy,
        install_error: InstallError,
    ) -> Result<Self, CompletedTransferError> {
        if success == install_error.is_error() {
            return Err(CompletedTransferError::InconsistentOutcome {
                success,
                install_error,
            });
        }
        Ok(Self {
            success,
            other_node_id,
            transfer_id,
            validation_token,
            activation_strategy,
            install_error,
        })
    }

    /// Same attempt with a refreshed activation strategy.
    ///
    /// Only meaningful on success; failures keep their recorded strategy.
    pub fn with_activation_strategy(mut self, activation_strategy: ActivationStrategy) -> Self {
        if self.success {
            self.activation_strategy = activation_strategy;
        }
        self
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn other_node_id(&self) -> &NodeId {
        &self.other_node_id
    }

    pub fn transfer_id(&self) -> &TransferId {
        &self.transfer_id
    }

    pub fn validation_token(&self) -> Option<&ValidationToken> {
        self.validation_token.as_ref()
    }

    pub fn activation_strategy(&self) -> ActivationStrategy {
        self.activation_strategy
    }

    pub fn install_error(&self) -> InstallError {
        self.install_error
    }
}
