//! Trait definitions for hardware abstraction and external channels.
//!
//! This module defines the core abstractions that allow rs-winch to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Talk to different UI and bus transports
//!
//! # Submodules
//!
//! - `hardware`: Motor outputs, relay outputs, button inputs, pulse counter, clock
//! - `network`: UI channel and control-bus port traits
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`MotorOutputs`]: power / direction / frequency lines of the winch driver
//! - [`RelayOutputs`]: discrete outputs for the switch-bank relays
//! - [`ButtonInputs`]: raw momentary-switch levels
//! - [`PulseCounter`]: interrupt-fed tachometer counter
//! - [`Clock`]: wrap-safe millisecond tick source

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;
