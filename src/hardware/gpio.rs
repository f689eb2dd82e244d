use std::sync::Arc;

use tracing::trace;
use tracing::warn;

use super::DigitalInput;
use super::PositionSensor;
use crate::PhysicalPosition;

/// Position sensor read from a single digital input.
pub struct GpioPositionSensor {
    input: Arc<dyn DigitalInput>,
    open_level: u8,
}

impl GpioPositionSensor {
    pub fn new(
        input: Arc<dyn DigitalInput>,
        open_level: u8,
    ) -> Self {
        Self { input, open_level }
    }
}

impl PositionSensor for GpioPositionSensor {
    fn read_position(&self) -> PhysicalPosition {
        match self.input.level() {
            Some(level) => {
                let position = PhysicalPosition::from_level(level, self.open_level);
                trace!("sensor level {} -> {}", level, position);
                position
            }
            None => {
                warn!("position sensor could not be read");
                PhysicalPosition::Unknown
            }
        }
    }
}
