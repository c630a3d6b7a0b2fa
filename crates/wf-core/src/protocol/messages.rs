use serde::{Deserialize, Serialize};

use crate::activation::ActivationStrategy;
use crate::ids::{TransferId, ValidationToken};
use crate::transfer::InstallError;

/// Setup request sent by the phone on `/initiate_transfer`.
///
/// 传输建立请求。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialRequest {
    pub size_in_bytes: u64,
    pub transfer_id: TransferId,
    pub token: ValidationToken,
}

/// Reply to [`InitialRequest`]: whether the phone may stream the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupReply {
    pub proceed: bool,
}

/// Install result sent by the watch on `/finalize_transfer/{transfer_id}`.
///
/// 安装结果回执。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResponse {
    pub success: bool,
    pub activation_strategy: ActivationStrategy,
    pub error_code: InstallError,
    /// Token of the attempt this response belongs to.
    pub validation_token: ValidationToken,
}

impl InstallResponse {
    pub fn succeeded(
        activation_strategy: ActivationStrategy,
        validation_token: ValidationToken,
    ) -> Self {
        Self {
            success: true,
            activation_strategy,
            error_code: InstallError::NoError,
            validation_token,
        }
    }

    pub fn failed(error_code: InstallError, validation_token: ValidationToken) -> Self {
        Self {
            success: false,
            activation_strategy: ActivationStrategy::NoActionNeeded,
            error_code,
            validation_token,
        }
    }
}
