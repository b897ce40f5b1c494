//! Interrupt-driven tachometer pulse counter for ESP32.
//!
//! The hall sensor output is wired to a pulled input; each rising edge fires
//! a GPIO interrupt that increments an atomic counter. The coordinator drains
//! the counter once per measurement window with an atomic swap - the counter
//! is the only state shared with interrupt context, and it is never read and
//! cleared in two steps.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::config::MotorConfig;
use crate::traits::PulseCounter;
use esp_idf_hal::gpio::{AnyIOPin, Input, InterruptType, PinDriver, Pull};

/// Tachometer input with an interrupt-fed pulse counter.
pub struct Esp32Tacho<'d> {
    _pin: PinDriver<'d, AnyIOPin, Input>,
    count: Arc<AtomicU32>,
}

impl<'d> Esp32Tacho<'d> {
    /// Claims the tacho pin and attaches the edge interrupt.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization or interrupt setup fails.
    pub fn new(config: &MotorConfig) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut pin = PinDriver::input(unsafe { AnyIOPin::new(config.tacho_pin) })?;
        pin.set_pull(Pull::Up)?;
        pin.set_interrupt_type(InterruptType::PosEdge)?;

        let count = Arc::new(AtomicU32::new(0));
        let isr_count = Arc::clone(&count);
        // Runs in interrupt context: increment and get out.
        unsafe {
            pin.subscribe(move || {
                isr_count.fetch_add(1, Ordering::Relaxed);
            })?;
        }
        pin.enable_interrupt()?;

        Ok(Self { _pin: pin, count })
    }
}

impl PulseCounter for Esp32Tacho<'_> {
    fn take(&self) -> u32 {
        self.count.swap(0, Ordering::Relaxed)
    }
}
