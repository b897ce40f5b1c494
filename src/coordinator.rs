//! The event coordinator: one cooperative loop over buttons, UI, and bus.
//!
//! [`Coordinator`] owns the motor controller, the relay driver, the button
//! panel, and the tachometer counter. Each [`poll`](Coordinator::poll)
//! iteration runs to completion in a fixed order:
//!
//! 1. prune dead UI connections
//! 2. poll the debounced buttons and feed edges into the motor FSM
//! 3. drain enqueued UI command text
//! 4. drain inbound bus frames and apply the switch-bank decode/toggle logic
//! 5. emit the heartbeat when its interval has elapsed
//! 6. broadcast a snapshot if any of the above changed FSM or bank state
//!
//! No step blocks; the UI and bus collaborators only enqueue on their own
//! threads and are drained here. All interval checks use wraparound-safe
//! tick arithmetic.
//!
//! # Example
//!
//! ```rust
//! use rs_winch::config::Config;
//! use rs_winch::coordinator::Coordinator;
//! use rs_winch::hal::{MockButtons, MockBus, MockMotor, MockRelays, MockTacho, MockUi};
//!
//! let config = Config::default();
//! let mut coordinator = Coordinator::new(
//!     MockMotor::new(),
//!     MockRelays::new(),
//!     MockButtons::new(),
//!     MockTacho::new(),
//!     &config,
//! );
//!
//! let mut ui = MockUi::new();
//! let mut bus = MockBus::new();
//! ui.push_command("switchHigh");
//! coordinator.poll(0, &mut ui, &mut bus).unwrap();
//!
//! assert_eq!(coordinator.snapshot().controller_state, 1); // Braked
//! ```

use crate::bank::{RelayBank, RelayDriver};
use crate::config::Config;
use crate::input::ButtonPanel;
use crate::messages::{StatusSnapshot, UiCommand};
use crate::motor::{Trigger, WinchMotor};
use crate::protocol::{decode_change, encode_change, encode_heartbeat, BANK_SIZE};
use crate::traits::{BusPort, ButtonInputs, MotorOutputs, PulseCounter, RelayOutputs, UiChannel};

/// Serializes every input source into the motor FSM and the relay bank.
///
/// Exclusively owns all controller state; the UI and bus collaborators are
/// passed into [`poll`](Self::poll) and only ever see snapshots and encoded
/// frames.
///
/// # Type Parameters
///
/// - `M`: motor outputs
/// - `R`: relay outputs (error type unified with the motor's)
/// - `I`: raw button inputs
/// - `P`: tachometer pulse counter
pub struct Coordinator<M, R, I, P>
where
    M: MotorOutputs,
    R: RelayOutputs<Error = M::Error>,
    I: ButtonInputs,
    P: PulseCounter,
{
    motor: WinchMotor<M>,
    relays: RelayDriver<R>,
    inputs: I,
    panel: ButtonPanel,
    tacho: P,
    instance: u8,
    main_switch: u8,
    heartbeat_ms: u32,
    last_heartbeat: u32,
    pulses_per_rev: u32,
    rpm_window_ms: u32,
    last_rpm_window: u32,
    rpm: u32,
}

impl<M, R, I, P> Coordinator<M, R, I, P>
where
    M: MotorOutputs,
    R: RelayOutputs<Error = M::Error>,
    I: ButtonInputs,
    P: PulseCounter,
{
    /// Assembles the coordinator from its hardware parts and configuration.
    pub fn new(motor: M, relays: R, inputs: I, tacho: P, config: &Config) -> Self {
        Self {
            motor: WinchMotor::new(motor, &config.motor),
            relays: RelayDriver::new(RelayBank::from_config(&config.bank), relays),
            inputs,
            panel: ButtonPanel::new(config.input.settle_ms),
            tacho,
            instance: config.bank.instance,
            main_switch: config.bank.main_switch.clamp(1, BANK_SIZE),
            heartbeat_ms: config.bank.heartbeat_ms,
            last_heartbeat: 0,
            pulses_per_rev: config.motor.pulses_per_rev.max(1),
            rpm_window_ms: config.motor.rpm_window_ms.max(1),
            last_rpm_window: 0,
            rpm: 0,
        }
    }

    /// Run one loop iteration.
    ///
    /// Returns `Ok(true)` when FSM or bank state changed this iteration.
    pub fn poll(
        &mut self,
        now_ms: u32,
        ui: &mut impl UiChannel,
        bus: &mut impl BusPort,
    ) -> Result<bool, M::Error> {
        ui.prune();

        let mut changed = false;
        let mut want_snapshot = false;

        // Debounced buttons -> FSM triggers
        let levels = self.inputs.levels();
        for trigger in self.panel.poll(levels, now_ms) {
            changed |= self.motor.trigger(trigger)?;
        }

        // UI command text. Every received line is answered with a snapshot,
        // recognized or not.
        while let Some(text) = ui.try_recv() {
            want_snapshot = true;
            if let Some(command) = UiCommand::parse(&text) {
                changed |= self.apply_ui(command, bus)?;
            }
        }

        // Inbound bus frames
        while let Some(frame) = bus.try_receive() {
            if let Some(change) = decode_change(&frame, self.instance) {
                self.apply_bus_toggle(change.index, bus)?;
                changed = true;
            }
        }

        // Periodic heartbeat, independent of activity
        if now_ms.wrapping_sub(self.last_heartbeat) >= self.heartbeat_ms {
            self.last_heartbeat = now_ms;
            bus.send(&encode_heartbeat(self.instance, self.relays.bank().sync_field()));
        }

        // Speed measurement window
        if now_ms.wrapping_sub(self.last_rpm_window) >= self.rpm_window_ms {
            self.last_rpm_window = now_ms;
            let pulses = self.tacho.take();
            self.rpm = (pulses as u64 * 60_000 / (self.pulses_per_rev as u64 * self.rpm_window_ms as u64)) as u32;
        }

        if changed || want_snapshot {
            ui.broadcast(&self.snapshot());
        }
        Ok(changed)
    }

    /// Current state snapshot for the UI.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            controller_state: self.motor.state().index(),
            chain_out: 0,
            rpm: self.rpm,
            main_switch: self.relays.bank().is_on(self.main_switch),
        }
    }

    /// Borrow the motor controller.
    pub fn motor(&self) -> &WinchMotor<M> {
        &self.motor
    }

    /// Borrow the relay driver.
    pub fn relays(&self) -> &RelayDriver<R> {
        &self.relays
    }

    /// Mutably borrow the button inputs (useful for driving mocks in tests).
    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    /// Borrow the tachometer counter.
    pub fn tacho(&self) -> &P {
        &self.tacho
    }

    /// Last measured winch speed in rpm.
    #[inline]
    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    fn apply_ui(&mut self, command: UiCommand, bus: &mut impl BusPort) -> Result<bool, M::Error> {
        match command {
            UiCommand::Down => self.motor.trigger(Trigger::Forward),
            UiCommand::Up => self.motor.trigger(Trigger::Backward),
            UiCommand::Stop => self.motor.trigger(Trigger::Stop),
            UiCommand::SwitchHigh => self.set_main_switch(true, bus),
            UiCommand::SwitchLow => self.set_main_switch(false, bus),
            UiCommand::Slider(duty) => {
                self.motor.set_duty(duty)?;
                Ok(true)
            }
            // Snapshot goes out because the text was received at all.
            UiCommand::GetStatus => Ok(false),
        }
    }

    // Inbound command: flip live + sync bits, rebroadcast status and the
    // change acknowledgment, and follow through on the main switch.
    fn apply_bus_toggle(&mut self, index: u8, bus: &mut impl BusPort) -> Result<(), M::Error> {
        let on = self.relays.toggle_switch(index)?;
        bus.send(&encode_heartbeat(self.instance, self.relays.bank().sync_field()));
        bus.send(&encode_change(self.instance, index, on));
        if index == self.main_switch {
            let trigger = if on { Trigger::ToggleOn } else { Trigger::ToggleOff };
            self.motor.trigger(trigger)?;
        }
        Ok(())
    }

    fn set_main_switch(&mut self, on: bool, bus: &mut impl BusPort) -> Result<bool, M::Error> {
        self.relays.set_switch(self.main_switch, on)?;
        bus.send(&encode_heartbeat(self.instance, self.relays.bank().sync_field()));
        bus.send(&encode_change(self.instance, self.main_switch, on));
        let trigger = if on { Trigger::ToggleOn } else { Trigger::ToggleOff };
        self.motor.trigger(trigger)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockButtons, MockBus, MockMotor, MockRelays, MockTacho, MockUi};
    use crate::motor::MotorState;
    use crate::protocol::{PGN_BANK_CONTROL, PGN_BANK_STATUS};

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

    #[test]
    fn ui_switch_high_arms_the_fsm_and_acknowledges_on_the_bus() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        ui.push_command("switchHigh");
        assert!(c.poll(0, &mut ui, &mut bus).unwrap());

        assert_eq!(c.motor().state(), MotorState::Braked);
        assert!(c.relays().bank().is_on(config.bank.main_switch));
        // status rebroadcast + change ack
        let pgns: Vec<u32> = bus.sent.iter().map(|f| f.pgn).collect();
        assert!(pgns.contains(&PGN_BANK_STATUS));
        assert!(pgns.contains(&PGN_BANK_CONTROL));
        // the UI heard about it
        assert_eq!(ui.broadcasts.last().unwrap().controller_state, 1);
    }

    #[test]
    fn unknown_ui_text_still_broadcasts_a_snapshot() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        ui.push_command("frobnicate");
        assert!(!c.poll(0, &mut ui, &mut bus).unwrap());
        assert_eq!(ui.broadcasts.len(), 1);
        assert_eq!(c.motor().state(), MotorState::Off);
    }

    #[test]
    fn get_status_answers_immediately() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        ui.push_command("getStatus");
        c.poll(0, &mut ui, &mut bus).unwrap();
        assert_eq!(ui.broadcasts.len(), 1);
        assert_eq!(ui.broadcasts[0], c.snapshot());
    }

    #[test]
    fn prune_runs_every_iteration() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        c.poll(0, &mut ui, &mut bus).unwrap();
        c.poll(20, &mut ui, &mut bus).unwrap();
        assert_eq!(ui.prune_calls, 2);
    }

    #[test]
    fn heartbeat_period_and_wraparound() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        // Start the clock near the wrap so the interval spans overflow.
        let start = u32::MAX - 2_000;
        c.poll(start, &mut ui, &mut bus).unwrap();
        let after_first = bus.sent.len();
        assert_eq!(after_first, 1); // first poll always fires (elapsed >= interval)

        // 9 s later (still before the next interval, across the wrap)
        c.poll(start.wrapping_add(9_000), &mut ui, &mut bus).unwrap();
        assert_eq!(bus.sent.len(), after_first);

        // 10.5 s after the first beat: due again
        c.poll(start.wrapping_add(10_500), &mut ui, &mut bus).unwrap();
        assert_eq!(bus.sent.len(), after_first + 1);
        assert!(bus.sent.iter().all(|f| f.pgn == PGN_BANK_STATUS));
    }

    #[test]
    fn rpm_window_converts_pulses() {
        let config = Config::default();
        let mut c = coordinator(&config);
        let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

        c.poll(0, &mut ui, &mut bus).unwrap();
        for _ in 0..14 {
            c.tacho().pulse();
        }
        c.poll(1_000, &mut ui, &mut bus).unwrap();
        // 14 pulses / 2 per rev over 1 s = 7 rps = 420 rpm
        assert_eq!(c.rpm(), 420);
    }
}
