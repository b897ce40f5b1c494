//! Relay bank outputs using plain ESP32 GPIO.

use std::collections::HashMap;

use crate::config::BankConfig;
use crate::traits::RelayOutputs;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

/// One GPIO output per physical switch-bank slot.
///
/// Channel numbers are the GPIO numbers from [`BankConfig::relay_pins`];
/// the virtual slot never reaches this type.
pub struct Esp32Relays<'d> {
    channels: HashMap<i32, PinDriver<'d, AnyOutputPin, Output>>,
}

impl<'d> Esp32Relays<'d> {
    /// Claims and parks (low) every configured relay pin.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(config: &BankConfig) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut channels = HashMap::new();
        for (slot, &pin) in config.relay_pins.iter().enumerate() {
            if slot as u8 + 1 == crate::bank::VIRTUAL_SLOT {
                continue;
            }
            let mut driver = PinDriver::output(unsafe { AnyOutputPin::new(pin) })?;
            driver.set_low()?;
            channels.insert(pin, driver);
        }
        Ok(Self { channels })
    }
}

impl RelayOutputs for Esp32Relays<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn write(&mut self, channel: i32, on: bool) -> Result<(), Self::Error> {
        // Unmapped channels are ignored; the bank already filters the
        // virtual slot and config validation catches the rest.
        if let Some(pin) = self.channels.get_mut(&channel) {
            if on {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}
