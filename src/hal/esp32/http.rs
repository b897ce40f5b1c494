//! Embedded HTTP server playing the UI channel role on ESP32.
//!
//! Serves the same control page and endpoints as the desktop `web` service,
//! using esp-idf-svc's callback-based HTTP server:
//!
//! - `GET /api/status` - Latest state snapshot (JSON)
//! - `POST /api/command` - Submit one command token (plain text body)
//! - `GET /` - Web UI (embedded HTML)
//!
//! Handlers run on the HTTP server's own task, so they only enqueue command
//! text and read the last snapshot; [`Esp32UiChannel`] is the coordinator's
//! end of the shared state. There is no long-poll endpoint here - the page
//! falls back to plain polling against `/api/status`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::WebConfig;
use crate::messages::StatusSnapshot;
use crate::traits::{UiChannel, UiText};
use esp_idf_hal::io::{Read as _, Write as _};
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::EspIOError;

/// State shared between the HTTP handlers and the coordinator loop.
pub struct Esp32SharedUi {
    inbound: Mutex<VecDeque<UiText>>,
    latest: Mutex<StatusSnapshot>,
}

impl Esp32SharedUi {
    /// Creates empty shared state.
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            latest: Mutex::new(StatusSnapshot::default()),
        }
    }

    fn push_command(&self, text: &str) {
        let mut line = UiText::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.inbound.lock().unwrap().push_back(line);
    }
}

impl Default for Esp32SharedUi {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinator-side view of [`Esp32SharedUi`].
pub struct Esp32UiChannel {
    shared: Arc<Esp32SharedUi>,
}

impl Esp32UiChannel {
    /// Creates a channel over shared HTTP state.
    pub fn new(shared: Arc<Esp32SharedUi>) -> Self {
        Self { shared }
    }
}

impl UiChannel for Esp32UiChannel {
    fn prune(&mut self) {
        // HTTP requests are one-shot; the server owns connection lifetimes.
    }

    fn try_recv(&mut self) -> Option<UiText> {
        self.shared.inbound.lock().unwrap().pop_front()
    }

    fn broadcast(&mut self, snapshot: &StatusSnapshot) {
        *self.shared.latest.lock().unwrap() = *snapshot;
    }
}

/// HTTP server for the winch control UI.
pub struct Esp32HttpServer {
    _server: EspHttpServer<'static>,
}

impl Esp32HttpServer {
    /// Create and start the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server fails to start.
    pub fn new(config: &WebConfig, shared: Arc<Esp32SharedUi>) -> anyhow::Result<Self> {
        let server_config = Configuration {
            http_port: config.port,
            ..Default::default()
        };

        let mut server = EspHttpServer::new(&server_config)?;

        let shared_for_status = Arc::clone(&shared);
        let shared_for_command = Arc::clone(&shared);

        // GET /api/status - latest snapshot, wrapped the same way as the
        // desktop service so the page works against either server
        server.fn_handler(
            "/api/status",
            esp_idf_svc::http::Method::Get,
            move |req| {
                let snapshot = *shared_for_status.latest.lock().unwrap();
                let mut resp =
                    req.into_response(200, None, &[("Content-Type", "application/json")])?;
                resp.write_all(b"{\"success\":true,\"data\":")?;
                resp.write_all(snapshot.to_json().as_bytes())?;
                resp.write_all(b"}")?;
                Ok::<_, EspIOError>(())
            },
        )?;

        // POST /api/command - enqueue one command token
        server.fn_handler(
            "/api/command",
            esp_idf_svc::http::Method::Post,
            move |mut req| {
                let mut buf = [0u8; 64];
                let len = req.read(&mut buf).unwrap_or(0);
                let body = core::str::from_utf8(&buf[..len]).unwrap_or("");
                shared_for_command.push_command(body);
                let mut resp = req.into_ok_response()?;
                resp.write_all(b"{\"success\":true}")?;
                Ok::<_, EspIOError>(())
            },
        )?;

        // GET / - serve web UI (shared with desktop)
        server.fn_handler("/", esp_idf_svc::http::Method::Get, move |req| {
            let html = include_str!("../../../www/index.html");
            let mut resp = req.into_response(200, None, &[("Content-Type", "text/html")])?;
            resp.write_all(html.as_bytes())?;
            Ok::<_, EspIOError>(())
        })?;

        println!("[HTTP] Server started on port {}", config.port);

        Ok(Self { _server: server })
    }
}
