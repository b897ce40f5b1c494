//! WiFi connection management for the winch head unit.
//!
//! Provides synchronous WiFi station mode connection using esp-idf-svc.
//! When the persisted configuration is missing (provisioning forced), the
//! unit comes up as an access point with the configured setup SSID instead,
//! so the control page stays reachable.
//!
//! # Example
//!
//! ```ignore
//! use rs_winch::hal::esp32::Esp32Wifi;
//! use rs_winch::config::WifiConfig;
//!
//! let config = WifiConfig::default()
//!     .with_ssid("Boatnet")
//!     .with_password("secret123");
//!
//! let wifi = Esp32Wifi::connect(modem, sysloop, nvs, &config)?;
//! println!("IP: {:?}", wifi.ip_addr());
//! ```

use crate::config::WifiConfig;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{
    AccessPointConfiguration, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
};
use std::net::Ipv4Addr;

fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut buf = heapless::String::new();
    let _ = buf.push_str(s);
    buf
}

/// WiFi connection manager for the ESP32 winch head unit.
pub struct Esp32Wifi<'a> {
    wifi: BlockingWifi<EspWifi<'a>>,
}

impl<'a> Esp32Wifi<'a> {
    /// Connect to the configured network in station mode.
    ///
    /// This will:
    /// 1. Initialize the WiFi driver
    /// 2. Configure station mode with the provided credentials
    /// 3. Connect to the access point
    /// 4. Wait for DHCP to assign an IP address
    ///
    /// # Errors
    ///
    /// Returns an error if WiFi initialization, connection, or DHCP fails.
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &WifiConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: fixed(config.ssid.as_str()),
            password: fixed(config.password.as_str()),
            ..Default::default()
        }))?;

        println!("[WiFi] Starting...");
        wifi.start()?;

        println!("[WiFi] Connecting to '{}'...", config.ssid);
        wifi.connect()?;

        println!("[WiFi] Waiting for DHCP...");
        wifi.wait_netif_up()?;

        if let Ok(ip_info) = wifi.wifi().sta_netif().get_ip_info() {
            println!("[WiFi] Connected! IP: {}", ip_info.ip);
        }

        Ok(Self { wifi })
    }

    /// Bring up the provisioning access point instead of joining a network.
    ///
    /// Used when no valid persisted configuration exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if WiFi initialization fails.
    pub fn provision(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &WifiConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: fixed(config.ap_ssid.as_str()),
            password: fixed(config.ap_password.as_str()),
            ..Default::default()
        }))?;

        println!("[WiFi] Starting provisioning AP '{}'...", config.ap_ssid);
        wifi.start()?;
        wifi.wait_netif_up()?;

        Ok(Self { wifi })
    }

    /// Get the current IP address, if connected.
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        self.wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip)
    }

    /// Check if WiFi is connected.
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}
