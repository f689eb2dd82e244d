//! Hardware boundary: the position sensor input, the bolt actuator and the
//! alarm output. Drivers for real pins implement [`DigitalInput`] and
//! [`DigitalOutput`]; the lock logic only sees [`PositionSensor`] and
//! [`Actuator`].
mod gpio;
mod simulated;
mod stepper;

pub use gpio::*;
pub use simulated::*;
pub use stepper::*;

#[cfg(test)]
mod hardware_test;

#[cfg(test)]
use mockall::automock;

use crate::BoltPosition;
use crate::PhysicalPosition;

#[cfg_attr(test, automock)]
pub trait PositionSensor: Send + Sync + 'static {
    /// Live reading of the lock mechanism.
    fn read_position(&self) -> PhysicalPosition;
}

/// Opaque bolt and alarm capability. Calls may block for the duration of a
/// motor move but never fail.
#[cfg_attr(test, automock)]
pub trait Actuator: Send + Sync + 'static {
    fn set_bolt(
        &self,
        position: BoltPosition,
    );

    /// Alarm output: `true` drives it high.
    fn set_alarm(
        &self,
        on: bool,
    );
}

#[cfg_attr(test, automock)]
pub trait DigitalInput: Send + Sync + 'static {
    /// Current level (0 or 1), `None` if the pin cannot be read.
    fn level(&self) -> Option<u8>;
}

#[cfg_attr(test, automock)]
pub trait DigitalOutput: Send + Sync + 'static {
    fn set_level(
        &self,
        level: u8,
    );
}
