//! Simulated set-active permission.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::info;
use wf_core::ports::ActivationPermissionPort;

/// Permission state the user would change through the on-watch prompt.
#[derive(Debug)]
pub struct SimulatedPermission {
    granted: AtomicBool,
    can_request: AtomicBool,
}

impl SimulatedPermission {
    pub fn new(granted: bool, can_request: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
            can_request: AtomicBool::new(can_request),
        }
    }

    /// User accepted the prompt.
    pub fn grant(&self) {
        info!("set-active permission granted");
        self.granted.store(true, Ordering::SeqCst);
    }

    /// User denied the prompt and asked not to be asked again.
    pub fn deny_permanently(&self) {
        info!("set-active permission permanently denied");
        self.granted.store(false, Ordering::SeqCst);
        self.can_request.store(false, Ordering::SeqCst);
    }
}

impl Default for SimulatedPermission {
    fn default() -> Self {
        Self::new(false, true)
    }
}

#[async_trait]
impl ActivationPermissionPort for SimulatedPermission {
    async fn is_granted(&self) -> anyhow::Result<bool> {
        Ok(self.granted.load(Ordering::SeqCst))
    }

    async fn can_request(&self) -> anyhow::Result<bool> {
        Ok(self.can_request.load(Ordering::SeqCst))
    }
}
