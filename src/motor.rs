//! Winch motor state machine and output sequencing.
//!
//! This module provides [`MotorFsm`], the four-state machine governing the
//! winch, and [`WinchMotor`], which wraps it together with the duty setting
//! and drives the motor outputs on every transition.
//!
//! # States and Triggers
//!
//! ```text
//!           ToggleOn                Forward
//!   Off <------------> Braked <--------------> SpinningForward
//!           ToggleOff    ^   <--------------->
//!                        |        Backward      SpinningBackward
//!                        +-- Stop from either spinning state
//! ```
//!
//! `ToggleOff` also exits either spinning state straight to `Off` (opening
//! the main switch kills the winch outright). Every other (state, trigger)
//! pair is a silent no-op: no state change, no output writes.
//!
//! # Output Ordering
//!
//! Entering a state runs a fixed output sequence exactly once. For the
//! spinning states the order is power off, direction, frequency, power on.
//! The direction line must never change while power is asserted; the
//! sequence is the safety contract of this module, not an implementation
//! detail.
//!
//! # Example
//!
//! ```rust
//! use rs_winch::{MotorState, Trigger, WinchMotor};
//! use rs_winch::config::MotorConfig;
//! use rs_winch::hal::MockMotor;
//!
//! let mut motor = WinchMotor::new(MockMotor::new(), &MotorConfig::default());
//! assert_eq!(motor.state(), MotorState::Off);
//!
//! motor.trigger(Trigger::ToggleOn).unwrap();
//! motor.trigger(Trigger::Forward).unwrap();
//! assert_eq!(motor.state(), MotorState::SpinningForward);
//!
//! // Backward is not in the table for SpinningForward: no-op.
//! assert!(!motor.trigger(Trigger::Backward).unwrap());
//! assert_eq!(motor.state(), MotorState::SpinningForward);
//! ```

use crate::config::MotorConfig;
use crate::traits::{Direction, MotorOutputs};

/// Motor controller state.
///
/// Exactly one state is active at any time. The numeric
/// [`index`](Self::index) is what the UI snapshot reports as
/// `controllerState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MotorState {
    /// Main switch open; motion triggers are ignored.
    #[default]
    Off,
    /// Main switch closed, motor held stopped.
    Braked,
    /// Paying chain out.
    SpinningForward,
    /// Hauling chain in.
    SpinningBackward,
}

impl MotorState {
    /// Snapshot index of this state (declaration order).
    #[inline]
    pub const fn index(&self) -> u8 {
        match self {
            MotorState::Off => 0,
            MotorState::Braked => 1,
            MotorState::SpinningForward => 2,
            MotorState::SpinningBackward => 3,
        }
    }

    /// Returns true while the motor is powered and turning.
    #[inline]
    pub const fn is_spinning(&self) -> bool {
        matches!(self, MotorState::SpinningForward | MotorState::SpinningBackward)
    }
}

/// Operator intent fed into the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Close the main switch (arm the winch).
    ToggleOn,
    /// Open the main switch (disarm, stops any motion).
    ToggleOff,
    /// Run forward (chain out).
    Forward,
    /// Run backward (chain in).
    Backward,
    /// Stop motion, keep the winch armed.
    Stop,
}

/// The complete transition table. Pairs absent from this table leave the
/// state unchanged.
const TRANSITIONS: [(MotorState, Trigger, MotorState); 8] = [
    (MotorState::Off, Trigger::ToggleOn, MotorState::Braked),
    (MotorState::Braked, Trigger::ToggleOff, MotorState::Off),
    (MotorState::SpinningForward, Trigger::ToggleOff, MotorState::Off),
    (MotorState::SpinningBackward, Trigger::ToggleOff, MotorState::Off),
    (MotorState::Braked, Trigger::Forward, MotorState::SpinningForward),
    (MotorState::SpinningForward, Trigger::Stop, MotorState::Braked),
    (MotorState::Braked, Trigger::Backward, MotorState::SpinningBackward),
    (MotorState::SpinningBackward, Trigger::Stop, MotorState::Braked),
];

/// Table-driven four-state machine.
///
/// Pure state bookkeeping: output sequencing lives in [`WinchMotor`], which
/// runs a state's entry actions exactly once per applied transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotorFsm {
    state: MotorState,
}

impl MotorFsm {
    /// Creates a machine in [`MotorState::Off`].
    pub const fn new() -> Self {
        Self {
            state: MotorState::Off,
        }
    }

    /// Returns the active state.
    #[inline]
    pub const fn current(&self) -> MotorState {
        self.state
    }

    /// Applies a trigger against the transition table.
    ///
    /// Returns `Some(entered)` when a table entry matched, `None` for the
    /// silent no-op case.
    pub fn trigger(&mut self, trigger: Trigger) -> Option<MotorState> {
        for (from, on, to) in TRANSITIONS {
            if from == self.state && on == trigger {
                self.state = to;
                return Some(to);
            }
        }
        None
    }
}

/// Winch motor controller: FSM plus duty setting plus output sequencing.
///
/// Owns the motor output implementation and guarantees the per-state output
/// order. The duty value (0..=255) scales linearly into the configured
/// frequency range; while the motor is not spinning the frequency output is
/// pinned at the minimum.
///
/// # Type Parameter
///
/// - `M`: The motor output implementation ([`MotorOutputs`] trait)
pub struct WinchMotor<M: MotorOutputs> {
    fsm: MotorFsm,
    outputs: M,
    duty: u8,
    min_freq_hz: u32,
    max_freq_hz: u32,
}

impl<M: MotorOutputs> WinchMotor<M> {
    /// Creates a controller in the `Off` state.
    ///
    /// No outputs are written until the first applied transition; the
    /// platform bootstrap is responsible for parking the pins safe.
    pub fn new(outputs: M, config: &MotorConfig) -> Self {
        Self {
            fsm: MotorFsm::new(),
            outputs,
            duty: 0,
            min_freq_hz: config.min_freq_hz,
            max_freq_hz: config.max_freq_hz,
        }
    }

    /// Returns the active state.
    #[inline]
    pub fn state(&self) -> MotorState {
        self.fsm.current()
    }

    /// Returns the operator duty setting (0..=255).
    #[inline]
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Applies a trigger; on a table hit runs the entered state's output
    /// sequence exactly once.
    ///
    /// Returns `Ok(true)` when a transition was applied, `Ok(false)` for a
    /// no-op trigger (no outputs are touched in that case).
    pub fn trigger(&mut self, trigger: Trigger) -> Result<bool, M::Error> {
        match self.fsm.trigger(trigger) {
            Some(entered) => {
                self.enter(entered)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Updates the duty setting.
    ///
    /// While spinning, the frequency output follows immediately; otherwise
    /// the new duty only takes effect on the next spin-up.
    pub fn set_duty(&mut self, duty: u8) -> Result<(), M::Error> {
        self.duty = duty;
        if self.fsm.current().is_spinning() {
            self.outputs.set_frequency(self.scaled_frequency())?;
        }
        Ok(())
    }

    /// The frequency the speed output should carry right now.
    ///
    /// Linear duty scaling into `[min_freq_hz, max_freq_hz]`, pinned at the
    /// minimum while the motor is not spinning.
    pub fn scaled_frequency(&self) -> u32 {
        if !self.fsm.current().is_spinning() {
            return self.min_freq_hz;
        }
        let scaled = (self.max_freq_hz as u64 * self.duty as u64 / 255) as u32;
        scaled.max(self.min_freq_hz)
    }

    /// Borrow the underlying outputs (useful for inspecting mocks in tests).
    pub fn outputs(&self) -> &M {
        &self.outputs
    }

    /// Mutably borrow the underlying outputs.
    pub fn outputs_mut(&mut self) -> &mut M {
        &mut self.outputs
    }

    // Per-state entry sequence. The order of writes here is load-bearing:
    // power must be off before the direction line moves, and frequency must
    // be programmed before power comes back.
    fn enter(&mut self, state: MotorState) -> Result<(), M::Error> {
        match state {
            MotorState::Off | MotorState::Braked => {
                self.outputs.set_power(false)?;
                self.outputs.set_frequency(self.min_freq_hz)?;
            }
            MotorState::SpinningForward => {
                self.outputs.set_power(false)?;
                self.outputs.set_direction(Direction::Forward)?;
                self.outputs.set_frequency(self.scaled_frequency())?;
                self.outputs.set_power(true)?;
            }
            MotorState::SpinningBackward => {
                self.outputs.set_power(false)?;
                self.outputs.set_direction(Direction::Reverse)?;
                self.outputs.set_frequency(self.scaled_frequency())?;
                self.outputs.set_power(true)?;
            }
        }
        Ok(())
    }
}
