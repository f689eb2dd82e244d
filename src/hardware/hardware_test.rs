use std::sync::Arc;

use mockall::predicate::eq;
use mockall::Sequence;

use super::*;
use crate::edge_channel;
use crate::ActuatorConfig;
use crate::BoltPosition;
use crate::PhysicalPosition;

fn fast_actuator_config() -> ActuatorConfig {
    ActuatorConfig {
        steps_per_rotation: 8,
        step_delay_ms: 0,
        bolt_travel_degrees: 90,
    }
}

/// Records every level written to a pin.
#[derive(Default)]
struct RecordingPin {
    levels: parking_lot::Mutex<Vec<u8>>,
}

impl DigitalOutput for RecordingPin {
    fn set_level(
        &self,
        level: u8,
    ) {
        self.levels.lock().push(level);
    }
}

fn stepper() -> (StepperActuator, [Arc<RecordingPin>; 4], Arc<RecordingPin>) {
    let coils: [Arc<RecordingPin>; 4] = Default::default();
    let alarm = Arc::new(RecordingPin::default());
    let outputs: [Arc<dyn DigitalOutput>; 4] = [
        coils[0].clone(),
        coils[1].clone(),
        coils[2].clone(),
        coils[3].clone(),
    ];
    let actuator = StepperActuator::new(outputs, alarm.clone(), &fast_actuator_config());
    (actuator, coils, alarm)
}

fn phases(coils: &[Arc<RecordingPin>; 4]) -> Vec<[u8; 4]> {
    let levels: Vec<Vec<u8>> = coils.iter().map(|c| c.levels.lock().clone()).collect();
    (0..levels[0].len())
        .map(|i| [levels[0][i], levels[1][i], levels[2][i], levels[3][i]])
        .collect()
}

#[test]
fn test_gpio_sensor_maps_levels() {
    let mut input = MockDigitalInput::new();
    let mut seq = Sequence::new();
    input.expect_level().times(1).in_sequence(&mut seq).returning(|| Some(1));
    input.expect_level().times(1).in_sequence(&mut seq).returning(|| Some(0));
    input.expect_level().times(1).in_sequence(&mut seq).returning(|| None);

    let sensor = GpioPositionSensor::new(Arc::new(input), 1);

    assert_eq!(sensor.read_position(), PhysicalPosition::Open);
    assert_eq!(sensor.read_position(), PhysicalPosition::Closed);
    assert_eq!(sensor.read_position(), PhysicalPosition::Unknown);
}

#[test]
fn test_stepper_step_count_follows_travel() {
    let (actuator, _, _) = stepper();
    assert_eq!(actuator.steps_for(90), 2);
    assert_eq!(actuator.steps_for(-90), -2);
    assert_eq!(actuator.steps_for(360), 8);
}

/// # Case: opening rotates forward, closing rotates backward
///
/// ## Criterias:
/// 1. open plays the sequence forward, once per step, then de-energizes
/// 2. close plays it in reverse
/// 3. a repeated command does not move the motor
#[test]
fn test_stepper_bolt_moves() {
    let (actuator, coils, _) = stepper();

    actuator.set_bolt(BoltPosition::Open);
    let open = phases(&coils);
    let mut expected: Vec<[u8; 4]> = Vec::new();
    for _ in 0..2 {
        expected.extend(STEP_SEQUENCE);
    }
    expected.push([0; 4]);
    assert_eq!(open, expected);

    actuator.set_bolt(BoltPosition::Open);
    assert_eq!(phases(&coils).len(), open.len());

    actuator.set_bolt(BoltPosition::Closed);
    let all = phases(&coils);
    let close = &all[open.len()..];
    let mut reversed: Vec<[u8; 4]> = STEP_SEQUENCE.iter().rev().copied().collect();
    reversed.extend(STEP_SEQUENCE.iter().rev().copied());
    reversed.push([0; 4]);
    assert_eq!(close, reversed.as_slice());
}

#[test]
fn test_stepper_alarm_pin() {
    let (actuator, _, alarm) = stepper();

    actuator.set_alarm(true);
    actuator.set_alarm(false);

    // driven low at construction
    assert_eq!(*alarm.levels.lock(), vec![0, 1, 0]);
}

#[test]
fn test_stepper_alarm_with_mock_output() {
    let mut alarm = MockDigitalOutput::new();
    alarm.expect_set_level().with(eq(0)).times(1).returning(|_| ());
    alarm.expect_set_level().with(eq(1)).times(1).returning(|_| ());
    let coils: [Arc<dyn DigitalOutput>; 4] = [
        Arc::new(RecordingPin::default()),
        Arc::new(RecordingPin::default()),
        Arc::new(RecordingPin::default()),
        Arc::new(RecordingPin::default()),
    ];

    let actuator = StepperActuator::new(coils, Arc::new(alarm), &fast_actuator_config());
    actuator.set_alarm(true);
}

#[test]
fn test_simulated_board_records_commands() {
    let board = SimulatedBoard::new(PhysicalPosition::Closed);
    assert_eq!(board.read_position(), PhysicalPosition::Closed);
    assert_eq!(board.bolt(), None);

    board.set_bolt(BoltPosition::Open);
    board.set_alarm(true);
    board.set_alarm(true);

    assert_eq!(
        board.commands(),
        vec![
            ActuatorCommand::Bolt(BoltPosition::Open),
            ActuatorCommand::Alarm(true),
            ActuatorCommand::Alarm(true),
        ]
    );
    assert_eq!(board.alarm_commands(true), 2);
    assert!(board.alarm());
    assert_eq!(board.bolt(), Some(BoltPosition::Open));
}

#[tokio::test]
async fn test_simulated_board_fires_interrupt_on_move() {
    let board = SimulatedBoard::new(PhysicalPosition::Closed);
    let (handle, mut rx) = edge_channel(4, 7);
    board.attach_interrupt(handle);

    board.move_to(PhysicalPosition::Open);
    board.set_position(PhysicalPosition::Closed);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.sensor, 7);
    assert!(rx.try_recv().is_err());
    assert_eq!(board.read_position(), PhysicalPosition::Closed);
}
