//! Phone-side transfer use case.
//!
//! Drives one attempt end to end: setup handshake, package streaming, wait
//! for the watch's install response. Every step is mirrored into the phone's
//! installation status so the UI can render progress.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};
use wf_core::ports::{
    InstallationStatusPort, MessageChannelPort, PackageValidationPort, StatusStream,
};
use wf_core::protocol::{InitialRequest, InstallResponse, MessagePath, SetupReply};
use wf_core::{
    ActivationStrategy, CompletedTransfer, InstallError, InstallationStatus, NodeId,
    TransferConfig, TransferFailure, TransferId, ValidationToken,
};

use super::InstallationStatusControl;
use crate::usecases::{FeatureGate, ListConnectedWatches};

/// Result of [`TransferSender::initiate_transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub transfer_id: TransferId,
    pub install_error: InstallError,
    /// Strategy reported by the watch; `None` on failure.
    pub activation_strategy: Option<ActivationStrategy>,
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        !self.install_error.is_error()
    }
}

struct PendingResponse {
    token: ValidationToken,
    tx: oneshot::Sender<InstallResponse>,
}

struct AttemptFailure {
    failure: TransferFailure,
    token: Option<ValidationToken>,
}

impl AttemptFailure {
    fn new(failure: TransferFailure, token: Option<ValidationToken>) -> Self {
        Self { failure, token }
    }
}

pub struct TransferSender {
    config: TransferConfig,
    channel: Arc<dyn MessageChannelPort>,
    watches: ListConnectedWatches,
    validator: Arc<dyn PackageValidationPort>,
    status: Arc<dyn InstallationStatusPort>,
    status_control: InstallationStatusControl,
    feature_gate: Arc<FeatureGate>,
    /// Waiters for `/finalize_transfer/{id}`, keyed by transfer id.
    pending: Mutex<HashMap<TransferId, PendingResponse>>,
    /// One attempt at a time per phone.
    attempt_lock: Mutex<()>,
}

impl TransferSender {
    pub fn new(
        config: TransferConfig,
        channel: Arc<dyn MessageChannelPort>,
        watches: ListConnectedWatches,
        validator: Arc<dyn PackageValidationPort>,
        status: Arc<dyn InstallationStatusPort>,
        feature_gate: Arc<FeatureGate>,
    ) -> Self {
        Self {
            config,
            channel,
            watches,
            validator,
            status_control: InstallationStatusControl::new(status.clone()),
            status,
            feature_gate,
            pending: Mutex::new(HashMap::new()),
            attempt_lock: Mutex::new(()),
        }
    }

    /// Sends `package` to `target` and waits for the install result.
    ///
    /// Never fails: every problem is folded into the returned
    /// [`InstallError`] and a `Complete { success: false, .. }` status.
    pub async fn initiate_transfer(
        &self,
        target: &NodeId,
        package: Bytes,
        size_in_bytes: u64,
    ) -> TransferOutcome {
        let _attempt = self.attempt_lock.lock().await;
        let transfer_id = TransferId::new();

        let span = info_span!(
            "usecase.transfer_sender.initiate_transfer",
            transfer_id = %transfer_id,
            target = %target,
            size_in_bytes
        );
        async {
            let completed = match self
                .run_attempt(target, &transfer_id, package, size_in_bytes)
                .await
            {
                Ok((token, strategy)) => {
                    info!(activation_strategy = %strategy, "watch face transfer succeeded");
                    CompletedTransfer::succeeded(
                        target.clone(),
                        transfer_id.clone(),
                        Some(token),
                        strategy,
                    )
                }
                Err(AttemptFailure { failure, token }) => {
                    warn!(install_error = %InstallError::from(failure), "watch face transfer failed");
                    CompletedTransfer::failed(target.clone(), transfer_id.clone(), token, failure)
                }
            };

            let outcome = TransferOutcome {
                transfer_id: transfer_id.clone(),
                install_error: completed.install_error(),
                activation_strategy: completed.success().then(|| completed.activation_strategy()),
            };
            self.record(InstallationStatus::Complete(completed)).await;
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_attempt(
        &self,
        target: &NodeId,
        transfer_id: &TransferId,
        package: Bytes,
        size_in_bytes: u64,
    ) -> Result<(ValidationToken, ActivationStrategy), AttemptFailure> {
        self.ensure_watch_ready(target).await?;
        self.record(InstallationStatus::Sending).await;

        let token = self.validator.validate(&package).await.map_err(|e| {
            warn!(error = %e, "watch face package failed validation");
            AttemptFailure::new(TransferFailure::TransferError, None)
        })?;

        self.send_setup_request(target, transfer_id, &token, size_in_bytes)
            .await?;

        let response = self
            .stream_package(target, transfer_id, &token, package)
            .await?;

        if response.success {
            return Ok((token, response.activation_strategy));
        }
        let failure = TransferFailure::try_from(response.error_code)
            .unwrap_or(TransferFailure::WatchFaceInstallError);
        Err(AttemptFailure::new(failure, Some(token)))
    }

    async fn ensure_watch_ready(&self, target: &NodeId) -> Result<(), AttemptFailure> {
        if !self.feature_gate.is_enabled().await {
            info!("watch face feature disabled");
            return Err(AttemptFailure::new(TransferFailure::WatchNotReady, None));
        }
        match self.watches.is_ready(target).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!("target watch not connected or companion app missing");
                Err(AttemptFailure::new(TransferFailure::WatchNotReady, None))
            }
            Err(e) => {
                warn!(error = %e, "could not check target watch");
                Err(AttemptFailure::new(TransferFailure::WatchNotReady, None))
            }
        }
    }

    async fn send_setup_request(
        &self,
        target: &NodeId,
        transfer_id: &TransferId,
        token: &ValidationToken,
        size_in_bytes: u64,
    ) -> Result<(), AttemptFailure> {
        let setup_error =
            || AttemptFailure::new(TransferFailure::SendSetupRequestError, Some(token.clone()));

        let request = InitialRequest {
            size_in_bytes,
            transfer_id: transfer_id.clone(),
            token: token.clone(),
        };
        let payload = request.to_bytes().map_err(|e| {
            error!(error = %e, "failed to encode setup request");
            setup_error()
        })?;

        let reply = timeout(
            self.config.setup_timeout,
            self.channel
                .send_request(target, MessagePath::InitiateTransfer.as_str(), payload),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?self.config.setup_timeout, "setup request timed out");
            AttemptFailure::new(TransferFailure::SendSetupTimeout, Some(token.clone()))
        })?
        .map_err(|e| {
            warn!(error = %e, "setup request failed");
            setup_error()
        })?;

        let reply = SetupReply::from_bytes(&reply).map_err(|e| {
            warn!(error = %e, "undecodable setup reply");
            setup_error()
        })?;
        if !reply.proceed {
            info!("watch declined the transfer");
            return Err(setup_error());
        }
        debug!("watch accepted setup request");
        Ok(())
    }

    async fn stream_package(
        &self,
        target: &NodeId,
        transfer_id: &TransferId,
        token: &ValidationToken,
        package: Bytes,
    ) -> Result<InstallResponse, AttemptFailure> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(
            transfer_id.clone(),
            PendingResponse {
                token: token.clone(),
                tx,
            },
        );

        let exchange = async {
            self.channel
                .send_package(target, transfer_id, package)
                .await
                .map_err(|e| {
                    warn!(error = %e, "package transfer failed");
                    TransferFailure::TransferError
                })?;
            debug!("package delivered, waiting for install response");
            rx.await.map_err(|_| TransferFailure::TransferError)
        };

        let result = timeout(self.config.transfer_timeout, exchange).await;
        // Whatever happened, later responses for this attempt are stale.
        self.pending.lock().await.remove(transfer_id);

        match result {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(failure)) => Err(AttemptFailure::new(failure, Some(token.clone()))),
            Err(_) => {
                warn!(timeout = ?self.config.transfer_timeout, "install response timed out");
                Err(AttemptFailure::new(
                    TransferFailure::TransferTimeout,
                    Some(token.clone()),
                ))
            }
        }
    }

    /// Handles an install response from `/finalize_transfer/{transfer_id}`.
    ///
    /// Delivered to the in-flight attempt when one waits for it. Otherwise a
    /// late update for the attempt recorded as `Complete` refreshes its
    /// activation strategy. Anything else is stale and dropped.
    pub async fn handle_finalize(
        &self,
        from: &NodeId,
        transfer_id: &TransferId,
        response: InstallResponse,
    ) {
        {
            let mut pending = self.pending.lock().await;
            let token_matches = pending
                .get(transfer_id)
                .map(|waiter| waiter.token == response.validation_token);
            match token_matches {
                Some(true) => {
                    if let Some(waiter) = pending.remove(transfer_id) {
                        // The attempt may have just timed out; nothing to do then.
                        let _ = waiter.tx.send(response);
                    }
                    return;
                }
                Some(false) => {
                    warn!(transfer_id = %transfer_id, from = %from, "install response token mismatch, dropped");
                    return;
                }
                None => {}
            }
        }

        let current = match self.status.read().await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "failed to read installation status");
                return;
            }
        };
        match current {
            InstallationStatus::Complete(done)
                if done.transfer_id() == transfer_id
                    && done.other_node_id() == from
                    && done.validation_token() == Some(&response.validation_token) =>
            {
                if !response.success || !done.success() {
                    debug!(transfer_id = %transfer_id, "late failure report ignored");
                    return;
                }
                info!(
                    transfer_id = %transfer_id,
                    activation_strategy = %response.activation_strategy,
                    "watch reported updated activation"
                );
                let updated = done.with_activation_strategy(response.activation_strategy);
                self.record(InstallationStatus::Complete(updated)).await;
            }
            InstallationStatus::Unknown
            | InstallationStatus::NotStarted
            | InstallationStatus::Receiving { .. }
            | InstallationStatus::Sending
            | InstallationStatus::Complete(_) => {
                debug!(transfer_id = %transfer_id, "stale install response discarded");
            }
        }
    }

    pub async fn reset_status(&self) -> anyhow::Result<()> {
        self.status_control.reset().await
    }

    pub async fn acknowledge_completion(&self) -> anyhow::Result<bool> {
        self.status_control.acknowledge_completion().await
    }

    pub async fn observe_status(&self) -> anyhow::Result<StatusStream> {
        self.status_control.observe().await
    }

    async fn record(&self, status: InstallationStatus) {
        if let Err(e) = self.status.write(&status).await {
            error!(error = %e, status = ?status, "failed to record installation status");
        }
    }
}
