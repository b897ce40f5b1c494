//! Hardware abstraction traits for motor outputs, relays, buttons, and timing.
//!
//! This module defines the hardware interfaces that allow rs-winch to run
//! across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MotorOutputs`] | Winch motor power, direction, and frequency outputs |
//! | [`RelayOutputs`] | Discrete outputs for the switch-bank relay channels |
//! | [`ButtonInputs`] | Raw momentary-switch levels (local + remote) |
//! | [`PulseCounter`] | Interrupt-fed tachometer pulse counter |
//! | [`Clock`] | Millisecond tick source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_winch::traits::{MotorOutputs, Direction};
//! use rs_winch::hal::MockMotor;
//!
//! let mut motor = MockMotor::new();
//! motor.set_power(false).unwrap();
//! motor.set_direction(Direction::Forward).unwrap();
//! motor.set_frequency(12_000).unwrap();
//! motor.set_power(true).unwrap();
//! ```

/// Direction of winch rotation.
///
/// Drives the motor driver's direction line. [`Forward`](Self::Forward)
/// pays chain out (anchor down), [`Reverse`](Self::Reverse) hauls it in.
///
/// # Default
///
/// Defaults to [`Forward`](Self::Forward); the direction line is only
/// meaningful while motor power is asserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Chain out (motor spins forward).
    #[default]
    Forward,
    /// Chain in (motor spins in reverse).
    Reverse,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_winch::Direction;
    ///
    /// assert_eq!(Direction::Forward.as_str(), "forward");
    /// assert_eq!(Direction::Reverse.as_str(), "reverse");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

/// Motor output trait - abstracts the winch driver's three control lines.
///
/// Implement this trait for your motor driver hardware. The three outputs
/// are deliberately separate operations: the state machine relies on being
/// able to sequence them individually, and power must already be deasserted
/// whenever the direction line changes.
///
/// # Implementation Notes
///
/// - `set_power` drives the driver's enable/contactor line
/// - `set_direction` must only switch the polarity line, never power
/// - `set_frequency` programs the speed output in Hz
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_winch::traits::{MotorOutputs, Direction};
///
/// struct MyDriver { /* hardware handles */ }
///
/// impl MotorOutputs for MyDriver {
///     type Error = ();
///
///     fn set_power(&mut self, on: bool) -> Result<(), ()> {
///         // drive the enable pin...
///         Ok(())
///     }
///
///     fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
///         // drive the reverse pin...
///         Ok(())
///     }
///
///     fn set_frequency(&mut self, freq_hz: u32) -> Result<(), ()> {
///         // reprogram the PWM timer...
///         Ok(())
///     }
/// }
/// ```
pub trait MotorOutputs {
    /// Error type for output operations.
    type Error;

    /// Assert or deassert motor power.
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Set the direction line.
    ///
    /// Callers guarantee power is deasserted when this is invoked.
    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error>;

    /// Set the speed output frequency in Hz.
    fn set_frequency(&mut self, freq_hz: u32) -> Result<(), Self::Error>;
}

/// Discrete relay outputs for the switch bank.
///
/// One channel per physical bank slot. The virtual slot never reaches this
/// trait; [`RelayDriver`](crate::bank::RelayDriver) filters it out.
///
/// # Implementation Notes
///
/// - `write` is fire-and-forget: no retries, no read-back verification
/// - Channel numbers are the GPIO mapping from
///   [`BankConfig`](crate::config::BankConfig)
pub trait RelayOutputs {
    /// Error type for relay operations.
    type Error;

    /// Drive one relay channel high or low.
    fn write(&mut self, channel: i32, on: bool) -> Result<(), Self::Error>;
}

/// Logical identity of a monitored momentary switch.
///
/// Two redundant sources exist for each motion direction: the panel-mounted
/// primary controls and the handheld remote duplicates. All four map onto
/// the same motor triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonRole {
    /// Panel "down" button (chain out).
    PrimaryDown,
    /// Panel "up" button (chain in).
    PrimaryUp,
    /// Remote "down" button.
    RemoteDown,
    /// Remote "up" button.
    RemoteUp,
}

impl ButtonRole {
    /// All roles, in polling order.
    pub const ALL: [ButtonRole; 4] = [
        ButtonRole::PrimaryDown,
        ButtonRole::RemoteDown,
        ButtonRole::PrimaryUp,
        ButtonRole::RemoteUp,
    ];

    /// Returns true for the two "down" sources.
    #[inline]
    pub const fn is_down(&self) -> bool {
        matches!(self, ButtonRole::PrimaryDown | ButtonRole::RemoteDown)
    }
}

/// Raw (undebounced) levels of all monitored buttons.
///
/// `true` means the button is electrically pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    /// Panel "down" level.
    pub primary_down: bool,
    /// Panel "up" level.
    pub primary_up: bool,
    /// Remote "down" level.
    pub remote_down: bool,
    /// Remote "up" level.
    pub remote_up: bool,
}

impl ButtonLevels {
    /// Returns the raw level for a role.
    #[inline]
    pub fn level(&self, role: ButtonRole) -> bool {
        match role {
            ButtonRole::PrimaryDown => self.primary_down,
            ButtonRole::PrimaryUp => self.primary_up,
            ButtonRole::RemoteDown => self.remote_down,
            ButtonRole::RemoteUp => self.remote_up,
        }
    }
}

/// Momentary-switch input trait.
///
/// Returns the instantaneous level of every monitored button. Debouncing is
/// not this trait's job; [`ButtonPanel`](crate::input::ButtonPanel) layers
/// it on top.
pub trait ButtonInputs {
    /// Sample all button levels.
    fn levels(&mut self) -> ButtonLevels;
}

/// Interrupt-fed tachometer pulse counter.
///
/// The hardware edge interrupt increments an atomic counter on its own
/// schedule; the coordinator consumes it with [`take`](Self::take). This
/// counter is the only mutable state shared across a concurrency boundary,
/// so the read must also reset it in a single atomic operation - never read
/// and clear in two steps.
pub trait PulseCounter {
    /// Atomically read and reset the accumulated pulse count.
    fn take(&self) -> u32;
}

/// Millisecond tick source.
///
/// The tick counter is monotonically increasing but narrow enough to wrap
/// during long uptimes, so interval checks must use `wrapping_sub`:
///
/// ```
/// let (now, then): (u32, u32) = (5_000, u32::MAX - 5_000);
/// assert!(now.wrapping_sub(then) >= 10_000);
/// ```
pub trait Clock {
    /// Current tick count in milliseconds.
    fn ticks_ms(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_default_is_forward() {
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn direction_as_str() {
        assert_eq!(Direction::Forward.as_str(), "forward");
        assert_eq!(Direction::Reverse.as_str(), "reverse");
    }

    #[test]
    fn button_levels_by_role() {
        let levels = ButtonLevels {
            primary_down: true,
            remote_up: true,
            ..Default::default()
        };
        assert!(levels.level(ButtonRole::PrimaryDown));
        assert!(!levels.level(ButtonRole::PrimaryUp));
        assert!(!levels.level(ButtonRole::RemoteDown));
        assert!(levels.level(ButtonRole::RemoteUp));
    }

    #[test]
    fn down_roles_classified() {
        assert!(ButtonRole::PrimaryDown.is_down());
        assert!(ButtonRole::RemoteDown.is_down());
        assert!(!ButtonRole::PrimaryUp.is_down());
        assert!(!ButtonRole::RemoteUp.is_down());
    }
}
