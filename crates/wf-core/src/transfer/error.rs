use serde::{Deserialize, Serialize};

/// Result code of one transfer attempt.
///
/// 单次传输尝试的结果码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallError {
    NoError,
    /// Feature disabled, or the target watch is not connected / lacks the companion app.
    WatchNotReady,
    /// The watch refused the setup request or it could not be delivered.
    SendSetupRequestError,
    SendSetupTimeout,
    /// Package bytes or the install acknowledgement could not be exchanged.
    TransferError,
    TransferTimeout,
    /// The platform install service rejected the package.
    WatchFaceInstallError,
}

impl InstallError {
    pub fn is_error(&self) -> bool {
        !matches!(self, InstallError::NoError)
    }
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstallError::NoError => "no_error",
            InstallError::WatchNotReady => "watch_not_ready",
            InstallError::SendSetupRequestError => "send_setup_request_error",
            InstallError::SendSetupTimeout => "send_setup_timeout",
            InstallError::TransferError => "transfer_error",
            InstallError::TransferTimeout => "transfer_timeout",
            InstallError::WatchFaceInstallError => "watch_face_install_error",
        };
        f.write_str(name)
    }
}

/// The failing subset of [`InstallError`].
///
/// Used wherever a value must not be `NoError`, so failed completions cannot
/// be built with a success code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFailure {
    WatchNotReady,
    SendSetupRequestError,
    SendSetupTimeout,
    TransferError,
    TransferTimeout,
    WatchFaceInstallError,
}

impl From<TransferFailure> for InstallError {
    fn from(failure: TransferFailure) -> Self {
        match failure {
            TransferFailure::WatchNotReady => InstallError::WatchNotReady,
            TransferFailure::SendSetupRequestError => InstallError::SendSetupRequestError,
            TransferFailure::SendSetupTimeout => InstallError::SendSetupTimeout,
            TransferFailure::TransferError => InstallError::TransferError,
            TransferFailure::TransferTimeout => InstallError::TransferTimeout,
            TransferFailure::WatchFaceInstallError => InstallError::WatchFaceInstallError,
        }
    }
}

impl TryFrom<InstallError> for TransferFailure {
    type Error = InstallError;

    /// Fails with `NoError` handed back unchanged.
    fn try_from(error: InstallError) -> Result<Self, Self::Error> {
        match error {
            InstallError::NoError => Err(error),
            InstallError::WatchNotReady => Ok(TransferFailure::WatchNotReady),
            InstallError::SendSetupRequestError => Ok(TransferFailure::SendSetupRequestError),
            InstallError::SendSetupTimeout => Ok(TransferFailure::SendSetupTimeout),
            InstallError::TransferError => Ok(TransferFailure::TransferError),
            InstallError::TransferTimeout => Ok(TransferFailure::TransferTimeout),
            InstallError::WatchFaceInstallError => Ok(TransferFailure::WatchFaceInstallError),
        }
    }
}
