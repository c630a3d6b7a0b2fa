//! Watch-side transfer use case.
//!
//! 手表端：接受传输请求，安装表盘，回传安装结果。

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};
use wf_core::ports::{
    InstallationStatusPort, MessageChannelPort, StatusStream, WatchFacePushPort, WatchFaceSlot,
};
use wf_core::protocol::{finalize_path, InitialRequest, InstallResponse};
use wf_core::{
    ActivationStrategy, CompletedTransfer, InstallError, InstallationStatus, NodeId,
    TransferFailure, TransferId, ValidationToken,
};

use super::{ActivationCoordinator, InstallationStatusControl};

/// Accepted setup request whose package has not arrived yet.
#[derive(Debug, Clone)]
struct AwaitingPackage {
    from: NodeId,
    transfer_id: TransferId,
    token: ValidationToken,
    size_in_bytes: u64,
}

pub struct TransferReceiver {
    channel: Arc<dyn MessageChannelPort>,
    push: Arc<dyn WatchFacePushPort>,
    status: Arc<dyn InstallationStatusPort>,
    status_control: InstallationStatusControl,
    activation: ActivationCoordinator,
    awaiting: Mutex<Option<AwaitingPackage>>,
}

impl TransferReceiver {
    pub fn new(
        channel: Arc<dyn MessageChannelPort>,
        push: Arc<dyn WatchFacePushPort>,
        status: Arc<dyn InstallationStatusPort>,
        activation: ActivationCoordinator,
    ) -> Self {
        Self {
            channel,
            push,
            status_control: InstallationStatusControl::new(status.clone()),
            status,
            activation,
            awaiting: Mutex::new(None),
        }
    }

    /// Answers a setup request. `true` lets the phone stream the package.
    pub async fn handle_incoming_transfer(&self, from: &NodeId, request: &InitialRequest) -> bool {
        let span = info_span!(
            "usecase.transfer_receiver.handle_incoming_transfer",
            from = %from,
            transfer_id = %request.transfer_id,
            size_in_bytes = request.size_in_bytes
        );
        async {
            let slots = match self.push.list_watch_faces().await {
                Ok(slots) => slots,
                Err(e) => {
                    warn!(error = %e, "cannot query watch face slots, rejecting transfer");
                    return false;
                }
            };
            if !slots.can_accept_package() {
                info!("no free or replaceable slot, rejecting transfer");
                return false;
            }

            let strategy = match self.activation.current_strategy().await {
                Ok(strategy) => strategy,
                Err(e) => {
                    warn!(error = %e, "activation state unavailable, assuming manual activation");
                    ActivationStrategy::LongPressToSet
                }
            };

            let previous = self.awaiting.lock().await.replace(AwaitingPackage {
                from: from.clone(),
                transfer_id: request.transfer_id.clone(),
                token: request.token.clone(),
                size_in_bytes: request.size_in_bytes,
            });
            if let Some(previous) = previous {
                debug!(superseded = %previous.transfer_id, "new transfer replaces pending one");
            }

            self.record(InstallationStatus::Receiving {
                other_node_id: from.clone(),
                transfer_id: request.transfer_id.clone(),
                validation_token: request.token.clone(),
                activation_strategy: strategy,
            })
            .await;
            info!(activation_strategy = %strategy, "transfer accepted");
            true
        }
        .instrument(span)
        .await
    }

    /// Installs a package streamed for an accepted transfer and reports the
    /// result to the sender. Packages for unknown transfers are dropped.
    pub async fn receive_package(&self, from: &NodeId, transfer_id: &TransferId, package: Bytes) {
        let span = info_span!(
            "usecase.transfer_receiver.receive_package",
            from = %from,
            transfer_id = %transfer_id,
            received_bytes = package.len()
        );
        async {
            let pending = {
                let mut awaiting = self.awaiting.lock().await;
                let matches = awaiting
                    .as_ref()
                    .is_some_and(|p| &p.transfer_id == transfer_id && &p.from == from);
                if matches {
                    awaiting.take()
                } else {
                    None
                }
            };
            let Some(pending) = pending else {
                debug!("package for unknown or stale transfer discarded");
                return;
            };

            if package.len() as u64 != pending.size_in_bytes {
                warn!(
                    expected = pending.size_in_bytes,
                    "package size does not match setup request"
                );
                self.finish_failed(&pending, TransferFailure::TransferError)
                    .await;
                return;
            }

            match self.install_into_slot(package, &pending.token).await {
                Ok(slot) => {
                    info!(slot_id = %slot.slot_id, version_code = slot.version_code, "watch face installed");
                    self.finish_installed(&pending).await;
                }
                Err(failure) => self.finish_failed(&pending, failure).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Adds the package to a free slot, or replaces the first installed one.
    pub async fn install_or_update(&self, package: Bytes, token: &ValidationToken) -> InstallError {
        match self.install_into_slot(package, token).await {
            Ok(_) => InstallError::NoError,
            Err(failure) => failure.into(),
        }
    }

    async fn install_into_slot(
        &self,
        package: Bytes,
        token: &ValidationToken,
    ) -> Result<WatchFaceSlot, TransferFailure> {
        let slots = self.push.list_watch_faces().await.map_err(|e| {
            warn!(error = %e, "cannot list watch face slots");
            TransferFailure::WatchFaceInstallError
        })?;

        let result = if slots.has_free_slot() {
            debug!("installing into free slot");
            self.push.add_watch_face(package, token).await
        } else if let Some(slot) = slots.installed.first() {
            debug!(slot_id = %slot.slot_id, "updating installed watch face in place");
            self.push
                .update_watch_face(&slot.slot_id, package, token)
                .await
        } else {
            warn!("no slot available for install");
            return Err(TransferFailure::WatchFaceInstallError);
        };

        result.map_err(|e| {
            warn!(error = %e, "watch face install failed");
            TransferFailure::WatchFaceInstallError
        })
    }

    /// Runs activation after an install and always sends the first
    /// acknowledgement, even while the user still has a prompt to answer.
    async fn finish_installed(&self, pending: &AwaitingPackage) {
        let strategy = self.activated_strategy().await;
        self.settle(pending, strategy).await;
        self.send_response(
            &pending.from,
            &pending.transfer_id,
            InstallResponse::succeeded(strategy, pending.token.clone()),
        )
        .await;
    }

    async fn activated_strategy(&self) -> ActivationStrategy {
        match self.activation.activate().await {
            Ok(strategy) => strategy,
            Err(e) => {
                warn!(error = %e, "activation failed after install");
                self.activation
                    .current_strategy()
                    .await
                    .unwrap_or(ActivationStrategy::LongPressToSet)
            }
        }
    }

    /// Records the installed watch face under `strategy`. Returns `true` when
    /// the transfer reached `Complete`.
    async fn settle(&self, pending: &AwaitingPackage, strategy: ActivationStrategy) -> bool {
        if strategy.requires_user_follow_up() {
            info!(activation_strategy = %strategy, "waiting for user to finish activation");
            self.record(InstallationStatus::Receiving {
                other_node_id: pending.from.clone(),
                transfer_id: pending.transfer_id.clone(),
                validation_token: pending.token.clone(),
                activation_strategy: strategy,
            })
            .await;
            return false;
        }

        self.record(InstallationStatus::Complete(CompletedTransfer::succeeded(
            pending.from.clone(),
            pending.transfer_id.clone(),
            Some(pending.token.clone()),
            strategy,
        )))
        .await;
        true
    }

    async fn finish_failed(&self, pending: &AwaitingPackage, failure: TransferFailure) {
        self.record(InstallationStatus::Complete(CompletedTransfer::failed(
            pending.from.clone(),
            pending.transfer_id.clone(),
            Some(pending.token.clone()),
            failure,
        )))
        .await;
        self.send_response(
            &pending.from,
            &pending.transfer_id,
            InstallResponse::failed(failure.into(), pending.token.clone()),
        )
        .await;
    }

    /// Result of the on-watch permission prompt.
    ///
    /// An answered prompt settles the transfer. When granted, activation runs
    /// again; when denied, the user is left with a manual strategy. The phone
    /// gets a second acknowledgement only once the status is `Complete`.
    pub async fn on_permission_result(&self, granted: bool) -> anyhow::Result<()> {
        let (from, transfer_id, token) = match self.status.read().await? {
            InstallationStatus::Receiving {
                other_node_id,
                transfer_id,
                validation_token,
                ..
            } => (other_node_id, transfer_id, validation_token),
            InstallationStatus::Unknown
            | InstallationStatus::NotStarted
            | InstallationStatus::Sending
            | InstallationStatus::Complete(_) => {
                debug!(granted, "permission result without a transfer awaiting activation");
                return Ok(());
            }
        };

        let still_receiving = self
            .awaiting
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| p.transfer_id == transfer_id);
        if still_receiving {
            debug!(granted, transfer_id = %transfer_id, "package not installed yet");
            return Ok(());
        }

        info!(granted, transfer_id = %transfer_id, "permission result received");
        let pending = AwaitingPackage {
            from,
            transfer_id,
            token,
            size_in_bytes: 0,
        };
        let strategy = if granted {
            self.activated_strategy().await
        } else {
            match self.activation.strategy_after_denied_prompt().await {
                Ok(strategy) => strategy,
                Err(e) => {
                    warn!(error = %e, "activation state unavailable after denied prompt");
                    ActivationStrategy::LongPressToSet
                }
            }
        };

        if self.settle(&pending, strategy).await {
            self.send_response(
                &pending.from,
                &pending.transfer_id,
                InstallResponse::succeeded(strategy, pending.token.clone()),
            )
            .await;
        } else {
            debug!("activation still waits on the user, no acknowledgement sent");
        }
        Ok(())
    }

    pub async fn reset_status(&self) -> anyhow::Result<()> {
        self.awaiting.lock().await.take();
        self.status_control.reset().await
    }

    pub async fn acknowledge_completion(&self) -> anyhow::Result<bool> {
        self.status_control.acknowledge_completion().await
    }

    pub async fn observe_status(&self) -> anyhow::Result<StatusStream> {
        self.status_control.observe().await
    }

    async fn send_response(&self, to: &NodeId, transfer_id: &TransferId, response: InstallResponse) {
        let payload = match response.to_bytes() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to encode install response");
                return;
            }
        };
        if let Err(e) = self
            .channel
            .send_message(to, &finalize_path(transfer_id), payload)
            .await
        {
            warn!(error = %e, "failed to send install response");
        }
    }

    async fn record(&self, status: InstallationStatus) {
        if let Err(e) = self.status.write(&status).await {
            error!(error = %e, status = ?status, "failed to record installation status");
        }
    }
}
