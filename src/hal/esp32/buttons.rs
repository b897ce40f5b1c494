//! Panel and remote button inputs for ESP32.
//!
//! All four buttons are wired to ground through the switch, with internal
//! pull-ups enabled: a low level means pressed. Debouncing happens in
//! [`crate::input::ButtonPanel`], this type only samples levels.

use crate::config::InputConfig;
use crate::traits::{ButtonInputs, ButtonLevels};
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

/// Raw button level sampler for the four monitored switches.
pub struct Esp32Buttons<'d> {
    primary_down: PinDriver<'d, AnyIOPin, Input>,
    primary_up: PinDriver<'d, AnyIOPin, Input>,
    remote_down: PinDriver<'d, AnyIOPin, Input>,
    remote_up: PinDriver<'d, AnyIOPin, Input>,
}

impl<'d> Esp32Buttons<'d> {
    /// Claims the configured button pins with pull-ups enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(config: &InputConfig) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut primary_down = PinDriver::input(unsafe { AnyIOPin::new(config.primary_down_pin) })?;
        let mut primary_up = PinDriver::input(unsafe { AnyIOPin::new(config.primary_up_pin) })?;
        let mut remote_down = PinDriver::input(unsafe { AnyIOPin::new(config.remote_down_pin) })?;
        let mut remote_up = PinDriver::input(unsafe { AnyIOPin::new(config.remote_up_pin) })?;

        primary_down.set_pull(Pull::Up)?;
        primary_up.set_pull(Pull::Up)?;
        remote_down.set_pull(Pull::Up)?;
        remote_up.set_pull(Pull::Up)?;

        Ok(Self {
            primary_down,
            primary_up,
            remote_down,
            remote_up,
        })
    }
}

impl ButtonInputs for Esp32Buttons<'_> {
    fn levels(&mut self) -> ButtonLevels {
        // Active low
        ButtonLevels {
            primary_down: self.primary_down.is_low(),
            primary_up: self.primary_up.is_low(),
            remote_down: self.remote_down.is_low(),
            remote_up: self.remote_up.is_low(),
        }
    }
}
