//! ESP32 clock implementation using the ESP-IDF timer.

use crate::traits::Clock;

/// ESP32 tick source using the hardware timer.
///
/// Provides millisecond ticks from the ESP-IDF `esp_timer_get_time()`
/// function (microseconds since boot), truncated to `u32`. The truncation
/// wraps after ~49.7 days of uptime; every consumer compares ticks with
/// `wrapping_sub`, so the wrap is harmless.
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn ticks_ms(&self) -> u32 {
        // Safe: this is a simple read of the hardware timer, no side effects
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        (micros / 1000) as u32
    }
}
