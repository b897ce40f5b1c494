//! Startup configuration for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Everything is created once at
//! startup from this configuration and lives for the process lifetime.
//!
//! A missing or unreadable persisted configuration is not an error: the
//! controller falls back to defaults and flags that provisioning should be
//! forced (see [`Config::load_or_default`]).
//!
//! # Example
//!
//! ```rust
//! use rs_winch::config::{Config, BankConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_bank(BankConfig::default().with_instance(4))
//!     .with_web(WebConfig::default().with_port(3000));
//! ```

use heapless::String as HString;

use crate::bank::{SlotOutput, VIRTUAL_SLOT};
use crate::protocol::BANK_SIZE;

/// Maximum length for short config strings (SSIDs, device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Take only what fits, on a valid UTF-8 boundary
    let take = s.len().min(MAX_SHORT_STRING);
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// WiFi connection configuration
    pub wifi: WifiConfig,
    /// Web server configuration
    pub web: WebConfig,
    /// Motor pin and scaling configuration
    pub motor: MotorConfig,
    /// Switch bank and bus configuration
    pub bank: BankConfig,
    /// Button input configuration
    pub input: InputConfig,
}

impl Config {
    /// Set WiFi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set motor configuration
    pub fn with_motor(mut self, motor: MotorConfig) -> Self {
        self.motor = motor;
        self
    }

    /// Set bank configuration
    pub fn with_bank(mut self, bank: BankConfig) -> Self {
        self.bank = bank;
        self
    }

    /// Set input configuration
    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    /// Parse a persisted JSON configuration.
    #[cfg(feature = "serde-json-core")]
    pub fn from_json(bytes: &[u8]) -> Option<Self> {
        serde_json_core::from_slice(bytes).ok().map(|(cfg, _)| cfg)
    }

    /// Serialize for persistence.
    #[cfg(feature = "serde-json-core")]
    pub fn to_json(&self) -> Option<heapless::String<1024>> {
        serde_json_core::to_string(self).ok()
    }

    /// Load a persisted configuration, falling back to defaults.
    ///
    /// Returns `(config, force_provisioning)`: when the stored bytes are
    /// absent or unreadable the defaults are used and the second element is
    /// `true`, telling the bootstrap to force the provisioning flow.
    #[cfg(feature = "serde-json-core")]
    pub fn load_or_default(stored: Option<&[u8]>) -> (Self, bool) {
        match stored.and_then(Self::from_json) {
            Some(config) => (config, false),
            None => (Self::default(), true),
        }
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// WiFi connection configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiConfig {
    /// Network SSID
    pub ssid: ShortString,
    /// Network password (empty = open network)
    pub password: ShortString,
    /// Access point SSID used while provisioning
    pub ap_ssid: ShortString,
    /// Access point password used while provisioning
    pub ap_password: ShortString,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            ap_ssid: short_string("WinchSetup"),
            ap_password: short_string("anchor123"),
        }
    }
}

impl WifiConfig {
    /// Set the network SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the network password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Polling interval hint for the web UI (milliseconds)
    pub poll_interval_ms: u32,
    /// Whether the web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
            poll_interval_ms: 1000,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

// ============================================================================
// Motor Config
// ============================================================================

/// Motor pin assignments and speed scaling
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfig {
    /// GPIO driving the motor power enable line
    pub power_pin: i32,
    /// GPIO driving the forward/reverse line
    pub direction_pin: i32,
    /// GPIO carrying the speed frequency output
    pub pwm_pin: i32,
    /// GPIO reading tachometer pulses
    pub tacho_pin: i32,
    /// Frequency floor in Hz (held while not spinning)
    pub min_freq_hz: u32,
    /// Frequency ceiling in Hz (duty 255)
    pub max_freq_hz: u32,
    /// Tachometer pulses per shaft revolution
    pub pulses_per_rev: u32,
    /// Speed measurement window in milliseconds
    pub rpm_window_ms: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            power_pin: 18,
            direction_pin: 0,
            pwm_pin: 25,
            tacho_pin: 2,
            min_freq_hz: 100,
            max_freq_hz: 25_000,
            pulses_per_rev: 2,
            rpm_window_ms: 1_000,
        }
    }
}

impl MotorConfig {
    /// Set the frequency range
    pub fn with_freq_range(mut self, min_hz: u32, max_hz: u32) -> Self {
        self.min_freq_hz = min_hz;
        self.max_freq_hz = max_hz;
        self
    }
}

// ============================================================================
// Bank Config
// ============================================================================

/// Switch bank and control-bus configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankConfig {
    /// Bank instance id on the bus; inbound commands for any other instance
    /// are ignored
    pub instance: u8,
    /// Bank slot (1-based) acting as the winch main switch
    pub main_switch: u8,
    /// Heartbeat broadcast period in milliseconds
    pub heartbeat_ms: u32,
    /// GPIO per bank slot; the entry for the virtual slot is ignored
    pub relay_pins: [i32; BANK_SIZE as usize],
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            instance: 0,
            main_switch: 1,
            heartbeat_ms: 10_000,
            relay_pins: [19, -1, 21, 22, 23, 26, 27, 14],
        }
    }
}

impl BankConfig {
    /// Set the bus instance id
    pub fn with_instance(mut self, instance: u8) -> Self {
        self.instance = instance;
        self
    }

    /// Set the heartbeat period
    pub fn with_heartbeat_ms(mut self, ms: u32) -> Self {
        self.heartbeat_ms = ms;
        self
    }

    /// Slot-to-output mapping with the virtual slot applied.
    pub fn slot_outputs(&self) -> [SlotOutput; BANK_SIZE as usize] {
        let mut outputs = [SlotOutput::Virtual; BANK_SIZE as usize];
        for (i, out) in outputs.iter_mut().enumerate() {
            if i as u8 + 1 != VIRTUAL_SLOT {
                *out = SlotOutput::Pin(self.relay_pins[i]);
            }
        }
        outputs
    }
}

// ============================================================================
// Input Config
// ============================================================================

/// Button input configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputConfig {
    /// Debounce settle interval in milliseconds
    pub settle_ms: u32,
    /// GPIO of the panel "down" button
    pub primary_down_pin: i32,
    /// GPIO of the panel "up" button
    pub primary_up_pin: i32,
    /// GPIO of the remote "down" button
    pub remote_down_pin: i32,
    /// GPIO of the remote "up" button
    pub remote_up_pin: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            settle_ms: 30,
            primary_down_pin: 32,
            primary_up_pin: 33,
            remote_down_pin: 34,
            remote_up_pin: 35,
        }
    }
}
