//! Desktop simulator for testing the web UI without hardware.
//!
//! Runs the full coordinator loop against mock hardware and serves the web
//! UI, so you can:
//! - Access the control page at http://localhost:8080
//! - Exercise every API endpoint
//! - Watch switch-bank frames the controller would put on the bus
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim --features web
//! ```
//!
//! # Configuration
//!
//! Edit the `Config::default()` call in `main()` to customize settings,
//! e.g.:
//! ```ignore
//! let config = Config::default()
//!     .with_bank(rs_winch::BankConfig::default().with_instance(4))
//!     .with_web(rs_winch::WebConfig::default().with_port(3000));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use rs_winch::config::Config;
use rs_winch::coordinator::Coordinator;
use rs_winch::hal::{MockButtons, MockMotor, MockRelays, MockTacho};
use rs_winch::protocol::BankFrame;
use rs_winch::services::{run_server, WebServerConfig, WebUiChannel, WebUiState};
use rs_winch::traits::BusPort;

/// Bus port that logs outbound frames instead of transmitting them.
struct LoggingBus;

impl BusPort for LoggingBus {
    fn try_receive(&mut self) -> Option<BankFrame> {
        None
    }

    fn send(&mut self, frame: &BankFrame) {
        println!(
            "[BUS] pgn={} instance={} status={:#06x}",
            frame.pgn,
            frame.instance(),
            frame.status()
        );
    }
}

fn main() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");

    rt.block_on(async {
        println!("=================================");
        println!("  rs-winch Desktop Simulator");
        println!("=================================");
        println!();

        let config = Config::default();
        let web_config = WebServerConfig::from_config(&config.web);

        println!("Starting web server...");
        println!("  Web UI: http://{}", web_config.addr);
        println!("  API:    http://{}/api/status", web_config.addr);
        println!();
        println!("Press Ctrl+C to stop.");
        println!();

        let state = Arc::new(WebUiState::new());

        // Coordinator loop on its own thread, 20 ms tick
        let loop_state = Arc::clone(&state);
        let loop_config = config.clone();
        std::thread::spawn(move || {
            let mut ui = WebUiChannel::new(loop_state);
            let mut bus = LoggingBus;
            let mut coordinator = Coordinator::new(
                MockMotor::new(),
                MockRelays::new(),
                MockButtons::new(),
                MockTacho::new(),
                &loop_config,
            );

            let start = Instant::now();
            loop {
                let now_ms = start.elapsed().as_millis() as u32;
                let _ = coordinator.poll(now_ms, &mut ui, &mut bus);
                std::thread::sleep(Duration::from_millis(20));
            }
        });

        if let Err(e) = run_server(state, web_config).await {
            eprintln!("Web server error: {}", e);
        }
    });
}
