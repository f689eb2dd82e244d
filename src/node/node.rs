//! A running lock: the controller, its protocol bridge and the debounce
//! worker that feeds it.
//!
//! ## Example Usage
//! ```rust,ignore
//! let node = LockNodeBuilder::new(None, shutdown_rx)?.build()?.ready()?;
//! tokio::spawn(async move {
//!     node.run().await.expect("lock node execution failed");
//! });
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::DebounceWorker;
use crate::InterruptHandle;
use crate::LockController;
use crate::LockNodeConfig;
use crate::LockState;
use crate::ProtocolBridge;
use crate::Result;
use crate::SystemError;

pub struct LockNode {
    pub(crate) controller: Arc<LockController>,
    pub(crate) bridge: ProtocolBridge,
    pub(crate) interrupt: InterruptHandle,
    /// Taken by the first `run()`.
    pub(crate) worker: Mutex<Option<DebounceWorker>>,
    pub(crate) ready: AtomicBool,

    pub node_config: Arc<LockNodeConfig>,
}

impl LockNode {
    /// Drives the sensor pipeline until shutdown.
    pub async fn run(&self) -> Result<()> {
        let worker = self
            .worker
            .lock()
            .await
            .take()
            .ok_or_else(|| SystemError::NodeStartFailed("lock node is already running".to_string()))?;

        self.set_ready(true);
        info!(
            "lock node {} running in state {}",
            self.node_config.device.device_name,
            self.controller.get_state()
        );

        let result = tokio::spawn(worker.run()).await;
        self.set_ready(false);
        result?;

        info!("lock node stopped");
        Ok(())
    }

    pub fn set_ready(
        &self,
        is_ready: bool,
    ) {
        self.ready.store(is_ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn controller(&self) -> Arc<LockController> {
        self.controller.clone()
    }

    pub fn bridge(&self) -> &ProtocolBridge {
        &self.bridge
    }

    /// Producer handle for the sensor interrupt line.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    pub fn state(&self) -> LockState {
        self.controller.get_state()
    }
}
