use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use tracing::debug;

use super::Actuator;
use super::PositionSensor;
use crate::BoltPosition;
use crate::InterruptHandle;
use crate::PhysicalPosition;

/// Command received by a [`SimulatedBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    Bolt(BoltPosition),
    Alarm(bool),
}

/// In-memory lock hardware. Moving the simulated mechanism raises an edge on
/// the attached interrupt, like the sensor pin would.
#[derive(Debug)]
pub struct SimulatedBoard {
    position: AtomicU8,
    alarm: AtomicBool,
    bolt: Mutex<Option<BoltPosition>>,
    commands: Mutex<Vec<ActuatorCommand>>,
    interrupt: Mutex<Option<InterruptHandle>>,
}

impl SimulatedBoard {
    pub fn new(position: PhysicalPosition) -> Self {
        Self {
            position: AtomicU8::new(encode(position)),
            alarm: AtomicBool::new(false),
            bolt: Mutex::new(None),
            commands: Mutex::new(Vec::new()),
            interrupt: Mutex::new(None),
        }
    }

    pub fn attach_interrupt(
        &self,
        handle: InterruptHandle,
    ) {
        *self.interrupt.lock() = Some(handle);
    }

    /// Moves the mechanism and fires the sensor interrupt.
    pub fn move_to(
        &self,
        position: PhysicalPosition,
    ) {
        self.set_position(position);
        if let Some(handle) = self.interrupt.lock().as_ref() {
            handle.notify();
        }
    }

    /// Moves the mechanism without raising an edge.
    pub fn set_position(
        &self,
        position: PhysicalPosition,
    ) {
        debug!("simulated lock moved to {}", position);
        self.position.store(encode(position), Ordering::SeqCst);
    }

    pub fn alarm(&self) -> bool {
        self.alarm.load(Ordering::SeqCst)
    }

    pub fn bolt(&self) -> Option<BoltPosition> {
        *self.bolt.lock()
    }

    pub fn commands(&self) -> Vec<ActuatorCommand> {
        self.commands.lock().clone()
    }

    pub fn alarm_commands(
        &self,
        on: bool,
    ) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|c| **c == ActuatorCommand::Alarm(on))
            .count()
    }
}

impl PositionSensor for SimulatedBoard {
    fn read_position(&self) -> PhysicalPosition {
        decode(self.position.load(Ordering::SeqCst))
    }
}

impl Actuator for SimulatedBoard {
    fn set_bolt(
        &self,
        position: BoltPosition,
    ) {
        *self.bolt.lock() = Some(position);
        self.commands.lock().push(ActuatorCommand::Bolt(position));
    }

    fn set_alarm(
        &self,
        on: bool,
    ) {
        self.alarm.store(on, Ordering::SeqCst);
        self.commands.lock().push(ActuatorCommand::Alarm(on));
    }
}

fn encode(position: PhysicalPosition) -> u8 {
    match position {
        PhysicalPosition::Unknown => 255,
        PhysicalPosition::Open => 1,
        PhysicalPosition::Closed => 0,
    }
}

fn decode(raw: u8) -> PhysicalPosition {
    match raw {
        1 => PhysicalPosition::Open,
        0 => PhysicalPosition::Closed,
        _ => PhysicalPosition::Unknown,
    }
}
