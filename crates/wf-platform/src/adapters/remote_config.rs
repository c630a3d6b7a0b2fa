use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use wf_core::ports::RemoteConfigPort;

/// Remote flag backed by a local value. Can be flipped at runtime.
#[derive(Debug)]
pub struct StaticRemoteConfig {
    watch_faces_enabled: AtomicBool,
}

impl StaticRemoteConfig {
    pub fn new(watch_faces_enabled: bool) -> Self {
        Self {
            watch_faces_enabled: AtomicBool::new(watch_faces_enabled),
        }
    }

    pub fn set_watch_faces_enabled(&self, enabled: bool) {
        self.watch_faces_enabled.store(enabled, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteConfigPort for StaticRemoteConfig {
    async fn watch_faces_enabled(&self) -> anyhow::Result<bool> {
        Ok(self.watch_faces_enabled.load(Ordering::SeqCst))
    }
}
