//! Builder for a [`LockNode`].
//!
//! Defaults to a sled backed [`SledOwnershipStore`] under
//! `device.db_root_dir` and a [`SimulatedBoard`] for the sensor and the
//! actuator. Hardware drivers replace the board through `sensor()` and
//! `actuator()`.
//!
//! ## Example
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let node = LockNodeBuilder::init(config, shutdown_rx)
//!     .hardware(board)
//!     .build()?
//!     .start_metrics_server(shutdown_tx.subscribe())
//!     .ready()?;
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::edge_channel;
use crate::init_sled_lock_db;
use crate::metrics;
use crate::Actuator;
use crate::DebounceWorker;
use crate::Debouncer;
use crate::InitFault;
use crate::LockController;
use crate::LockNode;
use crate::LockNodeConfig;
use crate::OwnershipStore;
use crate::PhysicalPosition;
use crate::PositionSensor;
use crate::ProtocolBridge;
use crate::Result;
use crate::SimulatedBoard;
use crate::SledOwnershipStore;
use crate::StorageError;
use crate::SystemError;

pub struct LockNodeBuilder {
    pub(super) node_config: LockNodeConfig,
    pub(super) store: Option<Arc<dyn OwnershipStore>>,
    pub(super) sensor: Option<Arc<dyn PositionSensor>>,
    pub(super) actuator: Option<Arc<dyn Actuator>>,
    pub(super) board: Option<Arc<SimulatedBoard>>,
    pub(super) shutdown_signal: watch::Receiver<()>,

    pub(super) node: Option<Arc<LockNode>>,
}

impl LockNodeBuilder {
    /// Loads the layered configuration, applies `config_path` on top and
    /// validates the result.
    pub fn new(
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Result<Self> {
        let mut node_config = LockNodeConfig::new()?;
        if let Some(p) = config_path {
            info!("with_override_config from: {}", &p);
            node_config = node_config.with_override_config(p)?;
        }
        Ok(Self::init(node_config.validate()?, shutdown_signal))
    }

    pub fn init(
        node_config: LockNodeConfig,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            node_config,
            store: None,
            sensor: None,
            actuator: None,
            board: None,
            shutdown_signal,
            node: None,
        }
    }

    pub fn store(
        mut self,
        store: Arc<dyn OwnershipStore>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sensor(
        mut self,
        sensor: Arc<dyn PositionSensor>,
    ) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn actuator(
        mut self,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Uses `board` as both sensor and actuator and wires its moves to the
    /// node's interrupt line.
    pub fn hardware(
        mut self,
        board: Arc<SimulatedBoard>,
    ) -> Self {
        self.sensor = Some(board.clone());
        self.actuator = Some(board.clone());
        self.board = Some(board);
        self
    }

    /// Assembles the controller and runs its startup sequence.
    ///
    /// A boot fault (tamper, unreadable store) leaves the lock in `Support`
    /// but still produces a node, so the state stays observable remotely.
    pub fn build(mut self) -> Result<Self> {
        let node_config = self.node_config.clone();

        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let db = init_sled_lock_db(&node_config.device.db_root_dir).map_err(StorageError::from)?;
                Arc::new(SledOwnershipStore::new(&db)?) as Arc<dyn OwnershipStore>
            }
        };

        if self.sensor.is_none() || self.actuator.is_none() {
            let position = if node_config.device.simulated_initially_closed {
                PhysicalPosition::Closed
            } else {
                PhysicalPosition::Open
            };
            warn!("no lock hardware configured, using a simulated board ({})", position);
            let board = Arc::new(SimulatedBoard::new(position));
            if self.sensor.is_none() {
                self.sensor = Some(board.clone());
            }
            if self.actuator.is_none() {
                self.actuator = Some(board.clone());
            }
            self.board = Some(board);
        }
        let (sensor, actuator) = match (self.sensor.take(), self.actuator.take()) {
            (Some(sensor), Some(actuator)) => (sensor, actuator),
            _ => return Err(SystemError::NodeStartFailed("lock hardware missing".to_string()).into()),
        };

        let controller = Arc::new(LockController::new(store, actuator, sensor.clone()));
        match controller.initialize() {
            Ok(ready) => info!("lock ready in state {} (owner {})", ready.state, ready.owner),
            Err(InitFault::AlreadyInitialized) => {
                return Err(SystemError::NodeStartFailed("lock controller initialized twice".to_string()).into());
            }
            Err(e) => error!("lock entered {} at boot: {}", controller.get_state(), e),
        }

        let sensor_config = &node_config.sensor;
        let (interrupt, events) = edge_channel(sensor_config.queue_capacity, sensor_config.input_pin);
        if let Some(board) = &self.board {
            board.attach_interrupt(interrupt.clone());
        }
        let worker = DebounceWorker::new(
            sensor_config.input_pin,
            Debouncer::new(sensor_config.quiet_period()),
            events,
            sensor,
            controller.clone(),
            self.shutdown_signal.clone(),
        );

        let node = LockNode {
            bridge: ProtocolBridge::new(controller.clone()),
            controller,
            interrupt,
            worker: Mutex::new(Some(worker)),
            ready: AtomicBool::new(false),
            node_config: Arc::new(node_config),
        };

        self.node = Some(Arc::new(node));
        Ok(self)
    }

    /// Launches the Prometheus endpoint when monitoring is enabled.
    pub fn start_metrics_server(
        self,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        metrics::init_metrics();
        if !self.node_config.monitoring.prometheus_enabled {
            return self;
        }

        let port = self.node_config.monitoring.prometheus_port;
        tokio::spawn(async move {
            metrics::start_server(port, shutdown_signal).await;
        });
        self
    }

    /// # Errors
    /// Returns `SystemError::NodeStartFailed` if `build()` has not completed.
    pub fn ready(self) -> Result<Arc<LockNode>> {
        self.node
            .ok_or_else(|| SystemError::NodeStartFailed("check node ready failed".to_string()).into())
    }
}
