//! ESP32 firmware entry point for the winch head unit.
//!
//! Boot sequence:
//! 1. Load the persisted configuration (defaults + forced provisioning when
//!    absent or unreadable)
//! 2. Bring up WiFi - station mode normally, the provisioning AP otherwise
//! 3. Claim the motor driver, relay, button, and tachometer pins
//! 4. Start the embedded HTTP UI server
//! 5. Run the coordinator loop at a 20 ms tick
//!
//! Build with:
//! ```sh
//! cargo build --bin esp32_main --features esp32-http --target xtensa-esp32-espidf
//! ```

use anyhow::Context;

use rs_winch::config::Config;
use rs_winch::coordinator::Coordinator;
use rs_winch::hal::esp32::{Esp32Buttons, Esp32Clock, Esp32Relays, Esp32Tacho, Esp32WinchDriver};
use rs_winch::traits::Clock;

fn main() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();

    println!();
    println!("================================");
    println!("  rs-winch head unit");
    println!("================================");
    println!();

    // Configuration: stored JSON, or defaults + forced provisioning.
    // The data partition is mounted by the platform bootstrap.
    let stored = std::fs::read("/spiffs/config.json").ok();
    let (config, force_provisioning) = Config::load_or_default(stored.as_deref());
    if force_provisioning {
        println!("[CFG] No usable stored config; using defaults, forcing provisioning");
    } else {
        println!("[CFG] Loaded stored config");
    }

    let peripherals = esp_idf_hal::peripherals::Peripherals::take()
        .context("failed to take ESP32 peripherals")?;

    // WiFi up before the HTTP server
    #[cfg(feature = "wifi")]
    let _wifi = {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use rs_winch::hal::esp32::Esp32Wifi;

        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take().ok();
        if force_provisioning {
            Esp32Wifi::provision(peripherals.modem, sysloop, nvs, &config.wifi)?
        } else {
            Esp32Wifi::connect(peripherals.modem, sysloop, nvs, &config.wifi)?
        }
    };

    // Hardware
    let motor = Esp32WinchDriver::new(peripherals.ledc, &config.motor)?;
    println!("[OK] Motor driver initialized");
    let relays = Esp32Relays::new(&config.bank)?;
    println!("[OK] Relay bank initialized");
    let buttons = Esp32Buttons::new(&config.input)?;
    println!("[OK] Buttons initialized");
    let tacho = Esp32Tacho::new(&config.motor)?;
    println!("[OK] Tachometer initialized");

    // UI channel
    #[cfg(feature = "esp32-http")]
    let (mut ui, _server) = {
        use rs_winch::hal::esp32::{Esp32HttpServer, Esp32SharedUi, Esp32UiChannel};
        use std::sync::Arc;

        let shared = Arc::new(Esp32SharedUi::new());
        let server = Esp32HttpServer::new(&config.web, Arc::clone(&shared))?;
        (Esp32UiChannel::new(shared), server)
    };
    #[cfg(not(feature = "esp32-http"))]
    let mut ui = HeadlessUi;

    // The boat's bus adapter hangs off a transceiver this board doesn't
    // carry yet; frames go nowhere until one is attached.
    let mut bus = StubBus;

    let clock = Esp32Clock::new();
    let mut coordinator = Coordinator::new(motor, relays, buttons, tacho, &config);

    println!();
    println!("[RUN] Coordinator loop started");
    loop {
        let now_ms = clock.ticks_ms();
        if coordinator.poll(now_ms, &mut ui, &mut bus).is_err() {
            println!("[ERR] output write failed; continuing");
        }
        esp_idf_hal::delay::FreeRtos::delay_ms(20);
    }
}

/// Stand-in bus port until a transceiver is fitted.
struct StubBus;

impl rs_winch::traits::BusPort for StubBus {
    fn try_receive(&mut self) -> Option<rs_winch::protocol::BankFrame> {
        None
    }

    fn send(&mut self, _frame: &rs_winch::protocol::BankFrame) {}
}

/// No-op UI channel for headless builds (no `esp32-http`).
#[cfg(not(feature = "esp32-http"))]
struct HeadlessUi;

#[cfg(not(feature = "esp32-http"))]
impl rs_winch::traits::UiChannel for HeadlessUi {
    fn prune(&mut self) {}

    fn try_recv(&mut self) -> Option<rs_winch::traits::UiText> {
        None
    }

    fn broadcast(&mut self, _snapshot: &rs_winch::messages::StatusSnapshot) {}
}
