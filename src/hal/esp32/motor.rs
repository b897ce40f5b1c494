//! Winch motor driver outputs using ESP32 GPIO + LEDC.
//!
//! The external motor driver takes three lines:
//! - power enable (GPIO, active high)
//! - direction (GPIO, low = forward)
//! - speed frequency (LEDC output at 50% duty; the driver counts edges)
//!
//! Frequency changes reprogram the LEDC timer; power and direction are plain
//! pin writes. The state machine sequences the three calls, this type only
//! executes them.

use crate::config::MotorConfig;
use crate::traits::{Direction, MotorOutputs};
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution, LEDC};
use esp_idf_hal::prelude::*;

/// ESP32 implementation of the winch driver's output lines.
///
/// # Example
///
/// ```ignore
/// use rs_winch::config::MotorConfig;
/// use rs_winch::hal::esp32::Esp32WinchDriver;
/// use rs_winch::traits::{Direction, MotorOutputs};
///
/// let peripherals = Peripherals::take()?;
/// let config = MotorConfig::default();
/// let mut driver = Esp32WinchDriver::new(peripherals.ledc, &config)?;
///
/// driver.set_power(false)?;
/// driver.set_direction(Direction::Forward)?;
/// driver.set_frequency(12_000)?;
/// driver.set_power(true)?;
/// ```
pub struct Esp32WinchDriver<'d> {
    power: PinDriver<'d, AnyOutputPin, Output>,
    direction: PinDriver<'d, AnyOutputPin, Output>,
    timer: LedcTimerDriver<'d>,
    _channel: LedcDriver<'d>,
}

impl<'d> Esp32WinchDriver<'d> {
    /// LEDC resolution; coarse is fine, the driver only counts edges.
    const PWM_RESOLUTION: Resolution = Resolution::Bits8;

    /// Creates the driver from the configured pins.
    ///
    /// All outputs are parked safe: power low, direction forward, frequency
    /// at the configured floor with the output held at 50% duty.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO or LEDC initialization fails.
    pub fn new(ledc: LEDC, config: &MotorConfig) -> Result<Self, esp_idf_hal::sys::EspError> {
        // Config pins are plain GPIO numbers loaded at startup.
        let power_pin = unsafe { AnyOutputPin::new(config.power_pin) };
        let direction_pin = unsafe { AnyOutputPin::new(config.direction_pin) };
        let pwm_pin = unsafe { AnyOutputPin::new(config.pwm_pin) };

        let mut power = PinDriver::output(power_pin)?;
        let mut direction = PinDriver::output(direction_pin)?;
        power.set_low()?;
        direction.set_low()?;

        let timer_config = TimerConfig::default()
            .frequency(config.min_freq_hz.Hz())
            .resolution(Self::PWM_RESOLUTION);
        let timer = LedcTimerDriver::new(ledc.timer0, &timer_config)?;

        let mut channel = LedcDriver::new(ledc.channel0, &timer, pwm_pin)?;
        let half = channel.get_max_duty() / 2;
        channel.set_duty(half)?;

        Ok(Self {
            power,
            direction,
            timer,
            _channel: channel,
        })
    }
}

impl MotorOutputs for Esp32WinchDriver<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn set_power(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.power.set_high()
        } else {
            self.power.set_low()
        }
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error> {
        match dir {
            Direction::Forward => self.direction.set_low(),
            Direction::Reverse => self.direction.set_high(),
        }
    }

    fn set_frequency(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        self.timer.set_frequency(freq_hz.Hz())
    }
}
