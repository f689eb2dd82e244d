use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use claimlock::LockNode;
use claimlock::LockNodeBuilder;
use claimlock::LockNodeConfig;
use claimlock::LockState;
use claimlock::OwnerId;
use claimlock::PhysicalPosition;
use claimlock::Result;
use claimlock::SimulatedBoard;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Quiet period used by the integration nodes.
pub const QUIET_PERIOD_MS: u64 = 50;

pub const WAIT_FOR_TRANSITION_IN_MS: u64 = 1000;

pub fn owner(text: &str) -> OwnerId {
    OwnerId::parse_str(text).expect("valid uuid")
}

pub fn node_config(db_root_dir: &Path) -> LockNodeConfig {
    let mut config = LockNodeConfig::default();
    config.device.db_root_dir = db_root_dir.to_path_buf();
    config.device.log_dir = db_root_dir.join("logs");
    config.sensor.debounce_quiet_period_ms = QUIET_PERIOD_MS;
    config
}

/// A node running on a sled store and a simulated board.
pub struct TestLock {
    pub node: Arc<LockNode>,
    pub board: Arc<SimulatedBoard>,
    shutdown_tx: watch::Sender<()>,
    runner: JoinHandle<Result<()>>,
}

impl TestLock {
    pub fn start(
        db_root_dir: &Path,
        position: PhysicalPosition,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let board = Arc::new(SimulatedBoard::new(position));
        let node = LockNodeBuilder::init(node_config(db_root_dir), shutdown_rx)
            .hardware(board.clone())
            .build()
            .expect("build node")
            .ready()
            .expect("node ready");

        let runner = {
            let node = node.clone();
            tokio::spawn(async move { node.run().await })
        };

        Self {
            node,
            board,
            shutdown_tx,
            runner,
        }
    }

    /// Moves the mechanism and waits for the debounced reading to land.
    pub async fn physical(
        &self,
        position: PhysicalPosition,
    ) {
        tokio::time::sleep(Duration::from_millis(QUIET_PERIOD_MS + 10)).await;
        self.board.move_to(position);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    pub async fn wait_for_state(
        &self,
        expected: LockState,
    ) {
        let mut rx = self.node.bridge().subscribe_state();
        timeout(
            Duration::from_millis(WAIT_FOR_TRANSITION_IN_MS),
            rx.wait_for(|state| *state == expected),
        )
        .await
        .unwrap_or_else(|_| panic!("lock never reached {}", expected))
        .expect("controller alive");
    }

    pub async fn wait_for_alarm(
        &self,
        on: bool,
    ) {
        timeout(Duration::from_millis(WAIT_FOR_TRANSITION_IN_MS), async {
            while self.board.alarm() != on {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("alarm never switched to {}", on));
    }

    /// Stops the node and releases the sled database.
    pub async fn stop(self) {
        self.shutdown_tx.send(()).expect("runner alive");
        self.runner.await.expect("runner joined").expect("clean stop");
    }
}
