//! UI command vocabulary and the outbound state snapshot.
//!
//! The UI transport is text based. Inbound commands are single tokens
//! (`down`, `up`, `stop`, `switchHigh`, `switchLow`, `slider-<0..255>`,
//! `getStatus`); anything else is accepted without error and still answered
//! with a snapshot. Outbound state is the [`StatusSnapshot`] JSON object:
//!
//! ```json
//! {"controllerState": 1, "chainOut": 0, "rpm": 0, "mainSwitch": true}
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_winch::messages::UiCommand;
//!
//! assert_eq!(UiCommand::parse("down"), Some(UiCommand::Down));
//! assert_eq!(UiCommand::parse("slider-128"), Some(UiCommand::Slider(128)));
//! assert_eq!(UiCommand::parse("make me a sandwich"), None);
//! ```

use core::fmt::Write as _;

/// Parsed inbound UI command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    /// Run forward (chain out).
    Down,
    /// Run backward (chain in).
    Up,
    /// Stop motion.
    Stop,
    /// Close the main switch.
    SwitchHigh,
    /// Open the main switch.
    SwitchLow,
    /// Set the speed duty value (0..=255).
    Slider(u8),
    /// Request an immediate snapshot.
    GetStatus,
}

impl UiCommand {
    /// Parse one command token.
    ///
    /// Input is trimmed; tokens are case-sensitive (they come from our own
    /// UI page, not from humans typing). Returns `None` for anything outside
    /// the vocabulary - the caller still answers with a snapshot.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(value) = text.strip_prefix("slider-") {
            return value.parse::<u8>().ok().map(UiCommand::Slider);
        }
        match text {
            "down" => Some(UiCommand::Down),
            "up" => Some(UiCommand::Up),
            "stop" => Some(UiCommand::Stop),
            "switchHigh" => Some(UiCommand::SwitchHigh),
            "switchLow" => Some(UiCommand::SwitchLow),
            "getStatus" => Some(UiCommand::GetStatus),
            _ => None,
        }
    }
}

/// State snapshot pushed to every UI client after each state-affecting
/// event (and immediately on `getStatus`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusSnapshot {
    /// Motor state index (see [`MotorState::index`](crate::MotorState::index)).
    pub controller_state: u8,
    /// Chain counter output. Reserved; always 0 in this controller.
    pub chain_out: u32,
    /// Measured winch speed in rpm.
    pub rpm: u32,
    /// Live state of the main switch bank slot.
    pub main_switch: bool,
}

impl StatusSnapshot {
    /// Render the snapshot as its JSON wire form.
    ///
    /// Hand-formatted so the embedded HTTP path does not need a serializer;
    /// field names match the serde `camelCase` renaming.
    pub fn to_json(&self) -> heapless::String<96> {
        let mut out = heapless::String::new();
        let _ = write!(
            out,
            r#"{{"controllerState":{},"chainOut":{},"rpm":{},"mainSwitch":{}}}"#,
            self.controller_state, self.chain_out, self.rpm, self.main_switch
        );
        out
    }
}
