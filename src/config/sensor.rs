use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Position sensor input and the debounce pipeline behind it
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SensorConfig {
    /// Input line the position sensor is wired to; edge events carry it
    #[serde(default = "default_input_pin")]
    pub input_pin: u32,

    /// Input level that means the lock is open (the other level is closed)
    #[serde(default = "default_open_level")]
    pub open_level: u8,

    /// Minimum spacing between two forwarded position changes
    #[serde(default = "default_quiet_period")]
    pub debounce_quiet_period_ms: u64,

    /// Capacity of the interrupt-to-worker queue; edges are dropped when full
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            input_pin: default_input_pin(),
            open_level: default_open_level(),
            debounce_quiet_period_ms: default_quiet_period(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.open_level > 1 {
            return Err(Error::InvalidConfig(format!(
                "open_level must be 0 or 1, got {}",
                self.open_level
            )));
        }

        if self.debounce_quiet_period_ms == 0 {
            return Err(Error::InvalidConfig(
                "debounce_quiet_period_ms must be greater than 0".into(),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig("queue_capacity must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_quiet_period_ms)
    }
}

fn default_input_pin() -> u32 {
    4
}
fn default_open_level() -> u8 {
    1
}
// in ms
fn default_quiet_period() -> u64 {
    200
}
fn default_queue_capacity() -> usize {
    10
}
