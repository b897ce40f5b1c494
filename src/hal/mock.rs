//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware and channel traits,
//! enabling development and testing on desktop without a winch attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockMotor`] | [`MotorOutputs`] | Records every output write in order |
//! | [`MockRelays`] | [`RelayOutputs`] | Records relay channel writes |
//! | [`MockButtons`] | [`ButtonInputs`] | Directly settable raw levels |
//! | [`MockTacho`] | [`PulseCounter`] | Atomic counter with a test feeder |
//! | [`MockClock`] | [`Clock`] | Controllable tick source |
//! | [`MockUi`] | [`UiChannel`] | Queued commands, captured broadcasts |
//! | [`MockBus`] | [`BusPort`] | Queued inbound frames, captured sends |
//!
//! # Example
//!
//! ```rust
//! use rs_winch::hal::{MockMotor, MotorOp};
//! use rs_winch::traits::{Direction, MotorOutputs};
//!
//! let mut motor = MockMotor::new();
//! motor.set_power(false).unwrap();
//! motor.set_direction(Direction::Reverse).unwrap();
//!
//! assert_eq!(
//!     motor.ops,
//!     vec![MotorOp::Power(false), MotorOp::Direction(Direction::Reverse)]
//! );
//! ```
//!
//! [`MotorOutputs`]: crate::traits::MotorOutputs
//! [`RelayOutputs`]: crate::traits::RelayOutputs
//! [`ButtonInputs`]: crate::traits::ButtonInputs
//! [`PulseCounter`]: crate::traits::PulseCounter
//! [`Clock`]: crate::traits::Clock
//! [`UiChannel`]: crate::traits::UiChannel
//! [`BusPort`]: crate::traits::BusPort

use core::sync::atomic::{AtomicU32, Ordering};
use std::collections::VecDeque;

use crate::messages::StatusSnapshot;
use crate::protocol::BankFrame;
use crate::traits::{
    BusPort, ButtonInputs, ButtonLevels, Clock, Direction, MotorOutputs, PulseCounter,
    RelayOutputs, UiChannel, UiText,
};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// One recorded motor output write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorOp {
    /// `set_power` call.
    Power(bool),
    /// `set_direction` call.
    Direction(Direction),
    /// `set_frequency` call.
    Frequency(u32),
}

/// Mock motor outputs for testing.
///
/// Records every write in call order, which is what the output-ordering
/// tests assert against. The latest values are also kept as plain fields.
///
/// # Example
///
/// ```rust
/// use rs_winch::hal::MockMotor;
/// use rs_winch::traits::MotorOutputs;
///
/// let mut motor = MockMotor::new();
/// motor.set_frequency(5_000).unwrap();
/// assert_eq!(motor.frequency_hz, 5_000);
/// assert_eq!(motor.ops.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockMotor {
    /// Every output write, in order.
    pub ops: Vec<MotorOp>,
    /// Latest power level.
    pub power: bool,
    /// Latest direction.
    pub direction: Direction,
    /// Latest frequency in Hz.
    pub frequency_hz: u32,
}

impl MockMotor {
    /// Creates a mock with no recorded writes.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorOutputs for MockMotor {
    type Error = ();

    fn set_power(&mut self, on: bool) -> Result<(), ()> {
        self.power = on;
        self.ops.push(MotorOp::Power(on));
        Ok(())
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
        self.direction = dir;
        self.ops.push(MotorOp::Direction(dir));
        Ok(())
    }

    fn set_frequency(&mut self, freq_hz: u32) -> Result<(), ()> {
        self.frequency_hz = freq_hz;
        self.ops.push(MotorOp::Frequency(freq_hz));
        Ok(())
    }
}

/// Mock relay outputs for testing.
///
/// Records `(channel, level)` pairs in call order.
#[derive(Debug, Default)]
pub struct MockRelays {
    /// Every channel write, in order.
    pub writes: Vec<(i32, bool)>,
}

impl MockRelays {
    /// Creates a mock with no recorded writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest level written to a channel, if any.
    pub fn level(&self, channel: i32) -> Option<bool> {
        self.writes
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, on)| *on)
    }
}

impl RelayOutputs for MockRelays {
    type Error = ();

    fn write(&mut self, channel: i32, on: bool) -> Result<(), ()> {
        self.writes.push((channel, on));
        Ok(())
    }
}

/// Mock button inputs with directly settable levels.
#[derive(Debug, Default)]
pub struct MockButtons {
    /// The levels the next `levels()` call returns.
    pub levels: ButtonLevels,
}

impl MockButtons {
    /// Creates a mock with all buttons released.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ButtonInputs for MockButtons {
    fn levels(&mut self) -> ButtonLevels {
        self.levels
    }
}

/// Mock tachometer counter.
///
/// Uses the same atomic read-and-reset contract as the hardware counter;
/// tests feed pulses with [`pulse`](Self::pulse).
#[derive(Debug, Default)]
pub struct MockTacho {
    count: AtomicU32,
}

impl MockTacho {
    /// Creates a mock with no accumulated pulses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate one tachometer edge (what the ISR would do).
    pub fn pulse(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

impl PulseCounter for MockTacho {
    fn take(&self) -> u32 {
        self.count.swap(0, Ordering::Relaxed)
    }
}

/// Mock clock for testing.
///
/// # Example
///
/// ```rust
/// use rs_winch::hal::MockClock;
/// use rs_winch::traits::Clock;
///
/// let mut clock = MockClock::new();
/// clock.advance(500);
/// assert_eq!(clock.ticks_ms(), 500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u32,
}

impl MockClock {
    /// Creates a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick counter.
    pub fn set(&mut self, ms: u32) {
        self.current_ms = ms;
    }

    /// Advances the tick counter (wrapping, like the hardware would).
    pub fn advance(&mut self, ms: u32) {
        self.current_ms = self.current_ms.wrapping_add(ms);
    }
}

impl Clock for MockClock {
    fn ticks_ms(&self) -> u32 {
        self.current_ms
    }
}

// ============================================================================
// Channel Mocks
// ============================================================================

/// Mock UI channel.
///
/// Queue inbound command text with [`push_command`](Self::push_command);
/// broadcasts and prune calls are recorded for inspection.
#[derive(Debug, Default)]
pub struct MockUi {
    inbound: VecDeque<UiText>,
    /// Every snapshot broadcast, in order.
    pub broadcasts: Vec<StatusSnapshot>,
    /// Number of times `prune` was called.
    pub prune_calls: usize,
}

impl MockUi {
    /// Creates an empty mock channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue inbound command text (truncated to the channel limit).
    pub fn push_command(&mut self, text: &str) {
        let mut line = UiText::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.inbound.push_back(line);
    }
}

impl UiChannel for MockUi {
    fn prune(&mut self) {
        self.prune_calls += 1;
    }

    fn try_recv(&mut self) -> Option<UiText> {
        self.inbound.pop_front()
    }

    fn broadcast(&mut self, snapshot: &StatusSnapshot) {
        self.broadcasts.push(*snapshot);
    }
}

/// Mock bus port.
///
/// Queue inbound frames with [`push_frame`](Self::push_frame); everything
/// sent outward is captured in [`sent`](Self::sent).
#[derive(Debug, Default)]
pub struct MockBus {
    inbound: VecDeque<BankFrame>,
    /// Every transmitted frame, in order.
    pub sent: Vec<BankFrame>,
}

impl MockBus {
    /// Creates an empty mock port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an inbound frame.
    pub fn push_frame(&mut self, frame: BankFrame) {
        self.inbound.push_back(frame);
    }
}

impl BusPort for MockBus {
    fn try_receive(&mut self) -> Option<BankFrame> {
        self.inbound.pop_front()
    }

    fn send(&mut self, frame: &BankFrame) {
        self.sent.push(*frame);
    }
}
