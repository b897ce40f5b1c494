//! Debounced button inputs and the press/release-to-trigger aggregator.
//!
//! Each physical momentary switch is monitored independently by a
//! [`DebouncedButton`] with a fixed settle window: level changes inside the
//! window are suppressed, so at most one press edge and one release edge are
//! reported per physical actuation.
//!
//! [`ButtonPanel`] aggregates the four monitored sources (primary and remote
//! duplicates of "down" and "up") into motor triggers:
//!
//! - press on either down-source issues [`Trigger::Forward`]
//! - press on either up-source issues [`Trigger::Backward`]
//! - a release edge on **any** monitored button issues [`Trigger::Stop`]
//!
//! The last rule is deliberate fidelity to the installed behavior: Stop is
//! issued without checking whether a different button is still held, so
//! releasing one of two simultaneously held buttons stops the winch.
//!
//! # Example
//!
//! ```rust
//! use rs_winch::input::DebouncedButton;
//! use rs_winch::traits::ButtonRole;
//!
//! let mut button = DebouncedButton::new(ButtonRole::PrimaryDown, 30);
//!
//! button.update(true, 0);      // contact closes
//! button.update(false, 10);    // bounce inside the settle window
//! button.update(true, 15);
//! button.update(true, 50);     // stable past the window
//!
//! assert!(button.take_pressed());
//! assert!(!button.take_pressed()); // edge reported once
//! ```

use heapless::Vec;

use crate::motor::Trigger;
use crate::traits::{ButtonLevels, ButtonRole};

/// One debounced momentary switch.
///
/// Tracks the raw level and only commits a new stable level after it has
/// held for the settle interval. Press/release edges are latched until
/// consumed with [`take_pressed`](Self::take_pressed) /
/// [`take_released`](Self::take_released).
///
/// All timing uses wraparound-safe `u32` tick arithmetic.
#[derive(Clone, Copy, Debug)]
pub struct DebouncedButton {
    role: ButtonRole,
    settle_ms: u32,
    raw: bool,
    stable: bool,
    raw_changed_at: u32,
    pressed_edge: bool,
    released_edge: bool,
}

impl DebouncedButton {
    /// Creates a released button with the given settle interval.
    pub const fn new(role: ButtonRole, settle_ms: u32) -> Self {
        Self {
            role,
            settle_ms,
            raw: false,
            stable: false,
            raw_changed_at: 0,
            pressed_edge: false,
            released_edge: false,
        }
    }

    /// Returns this button's logical role.
    #[inline]
    pub const fn role(&self) -> ButtonRole {
        self.role
    }

    /// Returns the debounced level.
    #[inline]
    pub const fn is_held(&self) -> bool {
        self.stable
    }

    /// Feed a raw level sample.
    ///
    /// Call once per loop iteration. Edges become observable only after the
    /// raw level has held steady for the settle interval.
    pub fn update(&mut self, raw: bool, now_ms: u32) {
        if raw != self.raw {
            self.raw = raw;
            self.raw_changed_at = now_ms;
        }
        if self.raw != self.stable && now_ms.wrapping_sub(self.raw_changed_at) >= self.settle_ms {
            self.stable = self.raw;
            if self.stable {
                self.pressed_edge = true;
            } else {
                self.released_edge = true;
            }
        }
    }

    /// Consume the press edge, if one is latched.
    pub fn take_pressed(&mut self) -> bool {
        let edge = self.pressed_edge;
        self.pressed_edge = false;
        edge
    }

    /// Consume the release edge, if one is latched.
    pub fn take_released(&mut self) -> bool {
        let edge = self.released_edge;
        self.released_edge = false;
        edge
    }
}

/// Aggregates all four monitored buttons into motor triggers.
///
/// Buttons are polled in the fixed order of [`ButtonRole::ALL`]; each poll
/// returns the triggers raised this iteration, presses before the release
/// that may accompany them on a later button.
pub struct ButtonPanel {
    buttons: [DebouncedButton; 4],
}

impl ButtonPanel {
    /// Creates a panel with the same settle interval on every source.
    pub fn new(settle_ms: u32) -> Self {
        Self {
            buttons: ButtonRole::ALL.map(|role| DebouncedButton::new(role, settle_ms)),
        }
    }

    /// Returns the debounced hold state of one source.
    pub fn is_held(&self, role: ButtonRole) -> bool {
        self.buttons
            .iter()
            .find(|b| b.role() == role)
            .map(DebouncedButton::is_held)
            .unwrap_or(false)
    }

    /// Feed one sample of raw levels and collect the resulting triggers.
    ///
    /// A press maps to the source's motion trigger; a release on any source
    /// maps to [`Trigger::Stop`] regardless of what else is held.
    pub fn poll(&mut self, levels: ButtonLevels, now_ms: u32) -> Vec<Trigger, 8> {
        let mut triggers = Vec::new();
        for button in self.buttons.iter_mut() {
            button.update(levels.level(button.role()), now_ms);
            if button.take_pressed() {
                let trigger = if button.role().is_down() {
                    Trigger::Forward
                } else {
                    Trigger::Backward
                };
                let _ = triggers.push(trigger);
            }
            if button.take_released() {
                let _ = triggers.push(Trigger::Stop);
            }
        }
        triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: u32 = 30;

    fn settle(button: &mut DebouncedButton, level: bool, from_ms: u32) -> u32 {
        button.update(level, from_ms);
        button.update(level, from_ms + SETTLE);
        from_ms + SETTLE
    }

    // =========================================================================
    // DebouncedButton
    // =========================================================================

    #[test]
    fn clean_press_and_release() {
        let mut b = DebouncedButton::new(ButtonRole::PrimaryDown, SETTLE);
        let t = settle(&mut b, true, 0);
        assert!(b.take_pressed());
        assert!(b.is_held());

        settle(&mut b, false, t + 10);
        assert!(b.take_released());
        assert!(!b.is_held());
    }

    #[test]
    fn bounce_inside_window_suppressed() {
        let mut b = DebouncedButton::new(ButtonRole::PrimaryUp, SETTLE);
        b.update(true, 0);
        b.update(false, 5);
        b.update(true, 12);
        b.update(false, 20);
        // never settled: no edge
        assert!(!b.take_pressed());
        assert!(!b.take_released());
        assert!(!b.is_held());
    }

    #[test]
    fn one_edge_per_actuation() {
        let mut b = DebouncedButton::new(ButtonRole::RemoteDown, SETTLE);
        let t = settle(&mut b, true, 0);
        // holding longer must not re-report the press
        b.update(true, t + 500);
        assert!(b.take_pressed());
        assert!(!b.take_pressed());
    }

    #[test]
    fn settle_timing_survives_tick_wraparound() {
        let mut b = DebouncedButton::new(ButtonRole::RemoteUp, SETTLE);
        let start = u32::MAX - 10;
        b.update(true, start);
        b.update(true, start.wrapping_add(SETTLE + 5)); // past the wrap
        assert!(b.take_pressed());
    }

    // =========================================================================
    // ButtonPanel
    // =========================================================================

    fn poll_settled(panel: &mut ButtonPanel, levels: ButtonLevels, at: u32) -> Vec<Trigger, 8> {
        panel.poll(levels, at);
        panel.poll(levels, at + SETTLE)
    }

    #[test]
    fn down_press_issues_forward() {
        let mut panel = ButtonPanel::new(SETTLE);
        let levels = ButtonLevels {
            primary_down: true,
            ..Default::default()
        };
        let triggers = poll_settled(&mut panel, levels, 0);
        assert_eq!(triggers.as_slice(), &[Trigger::Forward]);
    }

    #[test]
    fn remote_up_press_issues_backward() {
        let mut panel = ButtonPanel::new(SETTLE);
        let levels = ButtonLevels {
            remote_up: true,
            ..Default::default()
        };
        let triggers = poll_settled(&mut panel, levels, 0);
        assert_eq!(triggers.as_slice(), &[Trigger::Backward]);
    }

    #[test]
    fn any_release_issues_stop() {
        let mut panel = ButtonPanel::new(SETTLE);
        let held = ButtonLevels {
            primary_down: true,
            ..Default::default()
        };
        poll_settled(&mut panel, held, 0);

        let triggers = poll_settled(&mut panel, ButtonLevels::default(), 100);
        assert_eq!(triggers.as_slice(), &[Trigger::Stop]);
    }

    #[test]
    fn releasing_one_of_two_held_buttons_still_stops() {
        // Installed behavior: no cross-source hold tracking.
        let mut panel = ButtonPanel::new(SETTLE);
        let both = ButtonLevels {
            primary_down: true,
            remote_down: true,
            ..Default::default()
        };
        poll_settled(&mut panel, both, 0);

        let remote_released = ButtonLevels {
            primary_down: true,
            ..Default::default()
        };
        let triggers = poll_settled(&mut panel, remote_released, 100);
        assert_eq!(triggers.as_slice(), &[Trigger::Stop]);
        assert!(panel.is_held(ButtonRole::PrimaryDown));
    }

    #[test]
    fn simultaneous_press_on_both_down_sources() {
        let mut panel = ButtonPanel::new(SETTLE);
        let both = ButtonLevels {
            primary_down: true,
            remote_down: true,
            ..Default::default()
        };
        let triggers = poll_settled(&mut panel, both, 0);
        // one Forward per source; the FSM treats the second as a no-op
        assert_eq!(triggers.as_slice(), &[Trigger::Forward, Trigger::Forward]);
    }
}
