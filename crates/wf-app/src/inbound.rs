//! Inbound routers.
//!
//! Each device registers one [`InboundHandlerPort`] with its transport. The
//! router decodes the payload for the path and hands it to the use case.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use wf_core::ports::InboundHandlerPort;
use wf_core::protocol::{parse_finalize_path, InitialRequest, InstallResponse, MessagePath, SetupReply};
use wf_core::{NodeId, TransferId};

use crate::usecases::transfer::{TransferReceiver, TransferSender};

/// Phone side: only `/finalize_transfer/{id}` messages are expected.
pub struct PhoneInboundHandler {
    sender: Arc<TransferSender>,
}

impl PhoneInboundHandler {
    pub fn new(sender: Arc<TransferSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl InboundHandlerPort for PhoneInboundHandler {
    async fn on_request(
        &self,
        from: &NodeId,
        path: &str,
        _payload: &[u8],
    ) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("phone does not serve requests (path {path} from {from})")
    }

    async fn on_message(&self, from: &NodeId, path: &str, payload: &[u8]) -> anyhow::Result<()> {
        let Some(transfer_id) = parse_finalize_path(path) else {
            debug!(from = %from, path, "ignoring message on unknown path");
            return Ok(());
        };
        let response = InstallResponse::from_bytes(payload)
            .with_context(|| format!("decode install response for transfer {transfer_id}"))?;
        self.sender
            .handle_finalize(from, &transfer_id, response)
            .await;
        Ok(())
    }

    async fn on_package(
        &self,
        from: &NodeId,
        transfer_id: &TransferId,
        _package: Bytes,
    ) -> anyhow::Result<()> {
        debug!(from = %from, transfer_id = %transfer_id, "phone ignores inbound packages");
        Ok(())
    }
}

/// Watch side: setup requests and package streams.
pub struct WatchInboundHandler {
    receiver: Arc<TransferReceiver>,
}

impl WatchInboundHandler {
    pub fn new(receiver: Arc<TransferReceiver>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl InboundHandlerPort for WatchInboundHandler {
    async fn on_request(&self, from: &NodeId, path: &str, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
        match MessagePath::classify(path) {
            Some(MessagePath::InitiateTransfer) => {
                let request =
                    InitialRequest::from_bytes(payload).context("decode setup request")?;
                let proceed = self.receiver.handle_incoming_transfer(from, &request).await;
                Ok(SetupReply { proceed }.to_bytes()?)
            }
            Some(MessagePath::FinalizeTransfer) | None => {
                anyhow::bail!("unsupported request path {path}")
            }
        }
    }

    async fn on_message(&self, from: &NodeId, path: &str, _payload: &[u8]) -> anyhow::Result<()> {
        debug!(from = %from, path, "ignoring message on unknown path");
        Ok(())
    }

    async fn on_package(
        &self,
        from: &NodeId,
        transfer_id: &TransferId,
        package: Bytes,
    ) -> anyhow::Result<()> {
        self.receiver
            .receive_package(from, transfer_id, package)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::transfer::test_support::{
        FakePermission, FakeWatchFacePush, InMemoryOneShot, RecordingChannel, PACKAGE_NAME,
    };
    use crate::usecases::transfer::ActivationCoordinator;
    use crate::usecases::{FeatureGate, ListConnectedWatches};
    use std::time::Duration;
    use wf_core::ports::{
        ConnectedNode, InstallationStatusPort, NodeDiscoveryPort, PackageValidationPort,
        RemoteConfigPort,
    };
    use wf_core::{
        ActivationStrategy, InstallationStatus, TransferConfig, ValidationToken,
    };
    use wf_infra::InMemoryInstallationStatusStore;

    struct NoWatches;

    #[async_trait]
    impl NodeDiscoveryPort for NoWatches {
        async fn connected_nodes(&self) -> anyhow::Result<Vec<ConnectedNode>> {
            Ok(Vec::new())
        }
    }

    struct Enabled;

    #[async_trait]
    impl RemoteConfigPort for Enabled {
        async fn watch_faces_enabled(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    struct Token;

    #[async_trait]
    impl PackageValidationPort for Token {
        async fn validate(&self, _package: &[u8]) -> anyhow::Result<ValidationToken> {
            Ok(ValidationToken::from("token-1"))
        }
    }

    fn phone_handler() -> (PhoneInboundHandler, Arc<InMemoryInstallationStatusStore>) {
        let status = Arc::new(InMemoryInstallationStatusStore::new());
        let sender = TransferSender::new(
            TransferConfig {
                setup_timeout: Duration::from_secs(60),
                transfer_timeout: Duration::from_secs(60),
            },
            RecordingChannel::new(),
            ListConnectedWatches::new(Arc::new(NoWatches)),
            Arc::new(Token),
            status.clone(),
            Arc::new(FeatureGate::new(true, false, Arc::new(Enabled))),
        );
        (PhoneInboundHandler::new(Arc::new(sender)), status)
    }

    fn watch_handler(push: Arc<FakeWatchFacePush>) -> (WatchInboundHandler, Arc<InMemoryInstallationStatusStore>) {
        let status = Arc::new(InMemoryInstallationStatusStore::new());
        let activation = ActivationCoordinator::new(
            push.clone(),
            FakePermission::new(false, true),
            InMemoryOneShot::new(false),
            PACKAGE_NAME,
        );
        let receiver = TransferReceiver::new(RecordingChannel::new(), push, status.clone(), activation);
        (WatchInboundHandler::new(Arc::new(receiver)), status)
    }

    #[tokio::test]
    async fn phone_ignores_unknown_message_paths() {
        let (handler, status) = phone_handler();
        handler
            .on_message(&NodeId::from("watch-1"), "/something_else", b"junk")
            .await
            .unwrap();
        assert_eq!(status.read().await.unwrap(), InstallationStatus::NotStarted);
    }

    #[tokio::test]
    async fn phone_rejects_undecodable_install_response() {
        let (handler, _) = phone_handler();
        let result = handler
            .on_message(&NodeId::from("watch-1"), "/finalize_transfer/t1", &[0xff])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn phone_drops_finalize_for_unknown_transfer() {
        let (handler, status) = phone_handler();
        let payload = InstallResponse::succeeded(
            ActivationStrategy::NoActionNeeded,
            ValidationToken::from("token-1"),
        )
        .to_bytes()
        .unwrap();

        handler
            .on_message(&NodeId::from("watch-1"), "/finalize_transfer/t1", &payload)
            .await
            .unwrap();

        assert_eq!(status.read().await.unwrap(), InstallationStatus::NotStarted);
    }

    #[tokio::test]
    async fn watch_answers_setup_request_with_setup_reply() {
        let (handler, status) = watch_handler(FakeWatchFacePush::with_slots(vec![], 1));
        let request = InitialRequest {
            size_in_bytes: 3,
            transfer_id: TransferId::from("t1"),
            token: ValidationToken::from("token-1"),
        };

        let reply = handler
            .on_request(
                &NodeId::from("phone-1"),
                "/initiate_transfer",
                &request.to_bytes().unwrap(),
            )
            .await
            .unwrap();

        assert!(SetupReply::from_bytes(&reply).unwrap().proceed);
        assert!(status.read().await.unwrap().is_for_transfer(&TransferId::from("t1")));
    }

    #[tokio::test]
    async fn watch_declines_when_no_slot_is_usable() {
        let (handler, _) = watch_handler(FakeWatchFacePush::with_slots(vec![], 0));
        let request = InitialRequest {
            size_in_bytes: 3,
            transfer_id: TransferId::from("t1"),
            token: ValidationToken::from("token-1"),
        };

        let reply = handler
            .on_request(
                &NodeId::from("phone-1"),
                "/initiate_transfer",
                &request.to_bytes().unwrap(),
            )
            .await
            .unwrap();

        assert!(!SetupReply::from_bytes(&reply).unwrap().proceed);
    }

    #[tokio::test]
    async fn watch_rejects_unsupported_request_paths() {
        let (handler, _) = watch_handler(FakeWatchFacePush::with_slots(vec![], 1));
        let result = handler
            .on_request(&NodeId::from("phone-1"), "/finalize_transfer/t1", &[])
            .await;
        assert!(result.is_err());
    }
}
