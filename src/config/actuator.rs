use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Stepper motor driving the bolt (4-wire ULN2003 + 28BYJ-48)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActuatorConfig {
    /// Approximate number of steps for a full rotation
    #[serde(default = "default_steps_per_rotation")]
    pub steps_per_rotation: u32,

    /// Delay between coil phases in ms
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,

    /// Rotation between the bolt's closed and open positions
    #[serde(default = "default_bolt_travel")]
    pub bolt_travel_degrees: u32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            steps_per_rotation: default_steps_per_rotation(),
            step_delay_ms: default_step_delay(),
            bolt_travel_degrees: default_bolt_travel(),
        }
    }
}

impl ActuatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_rotation == 0 {
            return Err(Error::InvalidConfig(
                "steps_per_rotation must be greater than 0".into(),
            ));
        }

        if !(1..=360).contains(&self.bolt_travel_degrees) {
            return Err(Error::InvalidConfig(format!(
                "bolt_travel_degrees must be within 1..=360, got {}",
                self.bolt_travel_degrees
            )));
        }

        Ok(())
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

fn default_steps_per_rotation() -> u32 {
    511
}
fn default_step_delay() -> u64 {
    15
}
fn default_bolt_travel() -> u32 {
    90
}
