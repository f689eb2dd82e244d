use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;
use tracing::trace;
use tracing::warn;

use crate::SENSOR_EDGES_DROPPED;

pub type SensorId = u32;

/// Raw signal edge. Carries no level: the worker re-reads the live position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub sensor: SensorId,
    pub at: Instant,
}

/// Producer side of the edge queue, safe to call from an interrupt context:
/// it never blocks and never allocates.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    sensor: SensorId,
    tx: mpsc::Sender<EdgeEvent>,
}

impl InterruptHandle {
    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    /// Queues an edge stamped with the current time. Returns `false` when the
    /// edge was dropped because the queue is full or the worker is gone.
    pub fn notify(&self) -> bool {
        self.notify_at(Instant::now())
    }

    pub fn notify_at(
        &self,
        at: Instant,
    ) -> bool {
        let event = EdgeEvent { sensor: self.sensor, at };
        match self.tx.try_send(event) {
            Ok(()) => {
                trace!("queued edge from sensor {}", self.sensor);
                true
            }
            Err(TrySendError::Full(_)) => {
                SENSOR_EDGES_DROPPED.inc();
                warn!("edge queue full, dropped edge from sensor {}", self.sensor);
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("edge queue closed, sensor {} edge discarded", self.sensor);
                false
            }
        }
    }
}

/// Bounded edge queue for one sensor.
pub fn edge_channel(
    capacity: usize,
    sensor: SensorId,
) -> (InterruptHandle, mpsc::Receiver<EdgeEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (InterruptHandle { sensor, tx }, rx)
}
