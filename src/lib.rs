//! # rs-winch
//!
//! An anchor winch controller with physical buttons, a web UI, and marine
//! control-bus integration.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for motor outputs, relay outputs,
//!   button inputs, and the tachometer pulse counter
//! - **Safe output sequencing**: a four-state motor FSM whose entry actions
//!   guarantee power is never asserted while the direction line changes
//! - **Switch-bank bus protocol**: heartbeat, change, and command codecs for
//!   an 8-slot bank with one virtual slot
//! - **Multiple control sources**: debounced panel/remote buttons, UI text
//!   commands, and inbound bus frames, serialized by one polling coordinator
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and channel abstractions
//! - `motor` - Motor FSM and output sequencing
//! - `input` - Button debouncing and trigger aggregation
//! - `protocol` - Switch-bank frame codec
//! - `bank` - Relay bank state and output driver
//! - `coordinator` - The main polling loop that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_winch::config::Config;
//! use rs_winch::coordinator::Coordinator;
//! use rs_winch::hal::{MockButtons, MockBus, MockMotor, MockRelays, MockTacho, MockUi};
//! use rs_winch::MotorState;
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
//!
//! // Arm the winch, then run it forward from the panel button.
//! ui.push_command("switchHigh");
//! coordinator.poll(0, &mut ui, &mut bus).unwrap();
//! ui.push_command("down");
//! coordinator.poll(20, &mut ui, &mut bus).unwrap();
//!
//! assert_eq!(coordinator.motor().state(), MotorState::SpinningForward);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Relay bank state and the output driver behind it.
pub mod bank;
/// The event coordinator: one cooperative loop over buttons, UI, and bus.
pub mod coordinator;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Debounced button inputs and the press/release-to-trigger aggregator.
pub mod input;
/// UI command vocabulary and the outbound state snapshot.
pub mod messages;
/// Winch motor state machine and output sequencing.
pub mod motor;
/// Switch-bank protocol codec for the shared control bus.
pub mod protocol;
/// Core traits for hardware abstraction and external channels.
pub mod traits;

/// Shared configuration system for desktop and ESP32.
pub mod config;

/// Network services for the web UI channel (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use bank::{RelayBank, RelayDriver, SlotOutput, VIRTUAL_SLOT};
pub use coordinator::Coordinator;
pub use input::{ButtonPanel, DebouncedButton};
pub use messages::{StatusSnapshot, UiCommand};
pub use motor::{MotorFsm, MotorState, Trigger, WinchMotor};
pub use protocol::{
    decode_change, encode_change, encode_heartbeat, BankFrame, SwitchChange, SwitchState,
    BANK_SIZE, PGN_BANK_CONTROL, PGN_BANK_STATUS,
};
pub use traits::{
    BusPort, ButtonInputs, ButtonLevels, ButtonRole, Clock, Direction, MotorOutputs, PulseCounter,
    RelayOutputs, UiChannel, UiText, UI_COMMAND_MAX,
};

// Config re-exports
pub use config::{BankConfig, Config, InputConfig, MotorConfig, WebConfig, WifiConfig};
