use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use super::Debouncer;
use super::EdgeEvent;
use super::SensorId;
use crate::LockController;
use crate::PositionSensor;
use crate::SENSOR_EDGES_DEBOUNCED;

/// Single consumer of the edge queue. Runs until shutdown is signalled or
/// every [`crate::InterruptHandle`] is dropped.
pub struct DebounceWorker {
    sensor_id: SensorId,
    debouncer: Debouncer,
    events: mpsc::Receiver<EdgeEvent>,
    sensor: Arc<dyn PositionSensor>,
    controller: Arc<LockController>,
    shutdown_signal: watch::Receiver<()>,
}

impl DebounceWorker {
    pub fn new(
        sensor_id: SensorId,
        debouncer: Debouncer,
        events: mpsc::Receiver<EdgeEvent>,
        sensor: Arc<dyn PositionSensor>,
        controller: Arc<LockController>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            sensor_id,
            debouncer,
            events,
            sensor,
            controller,
            shutdown_signal,
        }
    }

    pub async fn run(mut self) {
        debug!(
            "debounce worker for sensor {} started, quiet period {:?}",
            self.sensor_id,
            self.debouncer.quiet_period()
        );
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_signal.changed() => {
                    warn!("[DebounceWorker:{}] shutdown signal received.", self.sensor_id);
                    return;
                }
                event = self.events.recv() => {
                    match event {
                        Some(event) => self.handle_edge(event).await,
                        None => {
                            debug!("edge queue closed, debounce worker exiting");
                            return;
                        }
                    }
                }
            }
        }
    }

    /// The controller call can block for a whole bolt move and a store
    /// flush, so it runs on the blocking pool.
    pub(crate) async fn handle_edge(
        &mut self,
        event: EdgeEvent,
    ) {
        if event.sensor != self.sensor_id {
            trace!("ignoring edge from sensor {}", event.sensor);
            return;
        }

        if !self.debouncer.accept(event.at) {
            SENSOR_EDGES_DEBOUNCED.inc();
            trace!("edge inside quiet period discarded");
            return;
        }

        let position = self.sensor.read_position();
        debug!("debounced edge, position is {}", position);
        let controller = self.controller.clone();
        match tokio::task::spawn_blocking(move || controller.on_position_changed(position)).await {
            Ok(Ok(state)) => trace!("position {} applied, state is {}", position, state),
            Ok(Err(e)) => error!("position change {} not applied: {}", position, e),
            Err(e) => error!("position change {} task failed: {}", position, e),
        }
    }
}
