use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::Actuator;
use super::DigitalOutput;
use crate::ActuatorConfig;
use crate::BoltPosition;

/// Two-phase full step sequence for a 4-wire unipolar stepper.
pub(crate) const STEP_SEQUENCE: [[u8; 4]; 4] = [
    [1, 1, 0, 0],
    [0, 1, 1, 0],
    [0, 0, 1, 1],
    [1, 0, 0, 1],
];

/// Bolt actuator built on a ULN2003 driven 28BYJ-48 stepper. Opening rotates
/// forward by the configured travel, closing rotates back.
pub struct StepperActuator {
    coils: [Arc<dyn DigitalOutput>; 4],
    alarm: Arc<dyn DigitalOutput>,
    steps_per_rotation: u32,
    travel_degrees: u32,
    step_delay: Duration,
    bolt: Mutex<Option<BoltPosition>>,
}

impl StepperActuator {
    pub fn new(
        coils: [Arc<dyn DigitalOutput>; 4],
        alarm: Arc<dyn DigitalOutput>,
        config: &ActuatorConfig,
    ) -> Self {
        alarm.set_level(0);
        Self {
            coils,
            alarm,
            steps_per_rotation: config.steps_per_rotation,
            travel_degrees: config.bolt_travel_degrees,
            step_delay: config.step_delay(),
            bolt: Mutex::new(None),
        }
    }

    /// Rotates by `count` full sequences; negative counts rotate backwards.
    /// Coils are de-energized afterwards.
    pub fn step(
        &self,
        count: i32,
    ) {
        let forward = count >= 0;
        for _ in 0..count.unsigned_abs() {
            for i in 0..STEP_SEQUENCE.len() {
                let phase = if forward {
                    STEP_SEQUENCE[i]
                } else {
                    STEP_SEQUENCE[STEP_SEQUENCE.len() - 1 - i]
                };
                self.energize(phase);
                self.pause();
            }
        }

        self.energize([0; 4]);
        self.pause();
    }

    pub fn rotate_degrees(
        &self,
        degrees: i32,
    ) {
        self.step(self.steps_for(degrees));
    }

    pub(crate) fn steps_for(
        &self,
        degrees: i32,
    ) -> i32 {
        (self.steps_per_rotation as i64 * degrees as i64 / 360) as i32
    }

    fn energize(
        &self,
        phase: [u8; 4],
    ) {
        for (coil, level) in self.coils.iter().zip(phase) {
            coil.set_level(level);
        }
    }

    fn pause(&self) {
        if !self.step_delay.is_zero() {
            thread::sleep(self.step_delay);
        }
    }
}

impl Actuator for StepperActuator {
    fn set_bolt(
        &self,
        position: BoltPosition,
    ) {
        let mut bolt = self.bolt.lock();
        if *bolt == Some(position) {
            debug!("bolt already {:?}", position);
            return;
        }

        let travel = self.travel_degrees as i32;
        match position {
            BoltPosition::Open => self.rotate_degrees(travel),
            BoltPosition::Closed => self.rotate_degrees(-travel),
        }
        debug!("set bolt {:?}", position);
        *bolt = Some(position);
    }

    fn set_alarm(
        &self,
        on: bool,
    ) {
        self.alarm.set_level(on as u8);
        debug!("set alarm output {}", if on { "HIGH" } else { "LOW" });
    }
}
