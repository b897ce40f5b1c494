//! Integration tests for the motor state machine and the event coordinator.

use rs_winch::config::Config;
use rs_winch::coordinator::Coordinator;
use rs_winch::hal::{MockButtons, MockBus, MockMotor, MockRelays, MockTacho, MockUi, MotorOp};
use rs_winch::traits::{ButtonLevels, Direction};
use rs_winch::{MotorState, Trigger, WinchMotor};

type TestCoordinator = Coordinator<MockMotor, MockRelays, MockButtons, MockTacho>;

fn coordinator(config: &Config) -> TestCoordinator {
    Coordinator::new(
        MockMotor::new(),
        MockRelays::new(),
        MockButtons::new(),
        MockTacho::new(),
        config,
    )
}

const SETTLE: u32 = 30;

/// Set raw levels and poll twice so they survive the debounce settle window.
fn poll_settled(
    c: &mut TestCoordinator,
    ui: &mut MockUi,
    bus: &mut MockBus,
    levels: ButtonLevels,
    at: u32,
) {
    c.inputs_mut().levels = levels;
    c.poll(at, ui, bus).unwrap();
    c.poll(at + SETTLE, ui, bus).unwrap();
}

// ============================================================================
// Scenario 1: full lift cycle with output assertions
// ============================================================================

#[test]
fn scenario_full_lift_cycle() {
    // Off -> ToggleOn -> Braked -> Forward -> SpinningForward -> Stop -> Braked,
    // asserting the output state at each step.
    let config = Config::default();
    let mut motor = WinchMotor::new(MockMotor::new(), &config.motor);
    motor.set_duty(255).unwrap();

    assert!(motor.trigger(Trigger::ToggleOn).unwrap());
    assert_eq!(motor.state(), MotorState::Braked);
    assert!(!motor.outputs().power);
    assert_eq!(motor.outputs().frequency_hz, config.motor.min_freq_hz);

    motor.outputs_mut().ops.clear();
    assert!(motor.trigger(Trigger::Forward).unwrap());
    assert_eq!(motor.state(), MotorState::SpinningForward);
    assert_eq!(
        motor.outputs().ops,
        vec![
            MotorOp::Power(false),
            MotorOp::Direction(Direction::Forward),
            MotorOp::Frequency(config.motor.max_freq_hz),
            MotorOp::Power(true),
        ]
    );

    assert!(motor.trigger(Trigger::Stop).unwrap());
    assert_eq!(motor.state(), MotorState::Braked);
    assert!(!motor.outputs().power);
    assert_eq!(motor.outputs().frequency_hz, config.motor.min_freq_hz);
}

#[test]
fn stop_from_spinning_brakes_but_stays_armed() {
    let config = Config::default();
    let mut motor = WinchMotor::new(MockMotor::new(), &config.motor);
    motor.trigger(Trigger::ToggleOn).unwrap();
    motor.trigger(Trigger::Backward).unwrap();
    motor.trigger(Trigger::Stop).unwrap();
    assert_eq!(motor.state(), MotorState::Braked);

    // still armed: Forward works again without another ToggleOn
    assert!(motor.trigger(Trigger::Forward).unwrap());
}

// ============================================================================
// Buttons through the coordinator
// ============================================================================

#[test]
fn panel_button_runs_the_winch() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    // Arm via UI, then press the panel down button
    ui.push_command("switchHigh");
    c.poll(0, &mut ui, &mut bus).unwrap();

    let down = ButtonLevels {
        primary_down: true,
        ..Default::default()
    };
    poll_settled(&mut c, &mut ui, &mut bus, down, 100);
    assert_eq!(c.motor().state(), MotorState::SpinningForward);

    // Release: back to Braked
    poll_settled(&mut c, &mut ui, &mut bus, ButtonLevels::default(), 300);
    assert_eq!(c.motor().state(), MotorState::Braked);
}

#[test]
fn scenario_release_of_one_held_button_stops_despite_other_held() {
    // Scenario 3: primary-down and remote-down both held; releasing only
    // remote-down still issues Stop. Installed behavior, kept as-is.
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    ui.push_command("switchHigh");
    c.poll(0, &mut ui, &mut bus).unwrap();

    let both = ButtonLevels {
        primary_down: true,
        remote_down: true,
        ..Default::default()
    };
    poll_settled(&mut c, &mut ui, &mut bus, both, 100);
    assert_eq!(c.motor().state(), MotorState::SpinningForward);

    let primary_only = ButtonLevels {
        primary_down: true,
        ..Default::default()
    };
    poll_settled(&mut c, &mut ui, &mut bus, primary_only, 300);
    assert_eq!(c.motor().state(), MotorState::Braked);
}

#[test]
fn buttons_do_nothing_while_disarmed() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    let down = ButtonLevels {
        remote_down: true,
        ..Default::default()
    };
    poll_settled(&mut c, &mut ui, &mut bus, down, 0);
    assert_eq!(c.motor().state(), MotorState::Off);
}

// ============================================================================
// UI commands through the coordinator
// ============================================================================

#[test]
fn slider_command_scales_the_spinning_frequency() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    ui.push_command("switchHigh");
    ui.push_command("slider-255");
    ui.push_command("down");
    c.poll(0, &mut ui, &mut bus).unwrap();

    assert_eq!(c.motor().state(), MotorState::SpinningForward);
    assert_eq!(c.motor().outputs().frequency_hz, config.motor.max_freq_hz);
    assert!(c.motor().outputs().power);
}

#[test]
fn toggle_off_while_spinning_kills_power() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    ui.push_command("switchHigh");
    ui.push_command("down");
    c.poll(0, &mut ui, &mut bus).unwrap();
    assert_eq!(c.motor().state(), MotorState::SpinningForward);

    ui.push_command("switchLow");
    c.poll(20, &mut ui, &mut bus).unwrap();
    assert_eq!(c.motor().state(), MotorState::Off);
    assert!(!c.motor().outputs().power);
}

#[test]
fn snapshot_reflects_state_and_main_switch() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    ui.push_command("switchHigh");
    c.poll(0, &mut ui, &mut bus).unwrap();

    let snapshot = ui.broadcasts.last().unwrap();
    assert_eq!(snapshot.controller_state, 1); // Braked
    assert!(snapshot.main_switch);
    assert_eq!(snapshot.chain_out, 0);
}
