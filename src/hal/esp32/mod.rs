//! ESP32 hardware abstraction layer for the winch head unit.
//!
//! This module provides hardware implementations for an ESP32 board driving
//! a frequency-controlled winch motor driver, a bank of relays, and the
//! panel/remote button inputs.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (dual-core Xtensa, 4MB Flash)
//! - **Motor driver**: external VFD-style driver taking power enable,
//!   direction, and a frequency input
//! - **Relays**: one GPIO per physical switch-bank slot
//! - **Tachometer**: hall sensor pulses on a pulled input
//!
//! # Pin Assignments
//!
//! Defaults live in [`crate::config`]; the constants in [`pins`] mirror
//! them for wiring reference.

mod buttons;
mod clock;
mod motor;
mod relays;
mod tacho;

pub use buttons::Esp32Buttons;
pub use clock::Esp32Clock;
pub use motor::Esp32WinchDriver;
pub use relays::Esp32Relays;
pub use tacho::Esp32Tacho;

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

#[cfg(feature = "esp32-http")]
mod http;
#[cfg(feature = "esp32-http")]
pub use http::{Esp32HttpServer, Esp32SharedUi, Esp32UiChannel};

/// Default pin assignments for the winch head unit.
///
/// These constants match the default [`crate::config::Config`]; a persisted
/// configuration overrides them at startup.
pub mod pins {
    // =========================================================================
    // Motor Driver
    // =========================================================================

    /// Motor power enable output
    pub const MOTOR_POWER: i32 = 18;

    /// Forward/reverse output
    pub const MOTOR_DIRECTION: i32 = 0;

    /// Speed frequency output (LEDC)
    pub const MOTOR_PWM: i32 = 25;

    /// Tachometer pulse input
    pub const TACHO: i32 = 2;

    // =========================================================================
    // Buttons (pulled up, active low)
    // =========================================================================

    /// Panel "down" button
    pub const BTN_PRIMARY_DOWN: i32 = 32;

    /// Panel "up" button
    pub const BTN_PRIMARY_UP: i32 = 33;

    /// Remote "down" button
    pub const BTN_REMOTE_DOWN: i32 = 34;

    /// Remote "up" button
    pub const BTN_REMOTE_UP: i32 = 35;
}
