//! Axum-based web UI channel for the winch controller.
//!
//! Provides the HTTP endpoints backing the control page:
//! - GET `/api/status` - Latest state snapshot
//! - GET `/api/events` - Long-poll for the next snapshot broadcast
//! - POST `/api/command` - Submit one command token (plain text body)
//! - GET `/` - Web UI (serves index.html)
//!
//! The server never touches controller state directly. Handlers enqueue
//! command text into [`WebUiState`] and read the snapshot the coordinator
//! last broadcast; [`WebUiChannel`] is the coordinator-side view of the same
//! state, implementing [`UiChannel`]. Command handlers accept any text -
//! vocabulary checking is the coordinator's business.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::messages::StatusSnapshot;
use crate::traits::{UiChannel, UiText};

use super::api::{ApiResponse, CommandResponse};

/// How long `/api/events` waits for a broadcast before answering with the
/// latest snapshot anyway.
const EVENTS_TIMEOUT: Duration = Duration::from_secs(25);

// ============================================================================
// Shared State
// ============================================================================

/// State shared between the HTTP handlers and the coordinator loop.
///
/// Handlers push command text and read/await snapshots; the coordinator
/// drains the command queue and pushes snapshots through [`WebUiChannel`].
pub struct WebUiState {
    inbound: Mutex<VecDeque<UiText>>,
    latest: Mutex<StatusSnapshot>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<StatusSnapshot>>>,
}

impl WebUiState {
    /// Creates empty shared state.
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            latest: Mutex::new(StatusSnapshot::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Enqueue one command token (truncated to the channel limit).
    ///
    /// This is the transport callback side: enqueue only, never interpret,
    /// never block.
    pub fn push_command(&self, text: &str) {
        let mut line = UiText::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.inbound.lock().unwrap().push_back(line);
    }

    /// The snapshot the coordinator last broadcast.
    pub fn latest(&self) -> StatusSnapshot {
        *self.latest.lock().unwrap()
    }

    /// Register a new snapshot subscriber (one long-poll request).
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StatusSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

impl Default for WebUiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinator-side view of [`WebUiState`].
///
/// Owned by whatever thread runs the coordinator loop; the axum handlers
/// hold clones of the same `Arc`.
pub struct WebUiChannel {
    state: Arc<WebUiState>,
}

impl WebUiChannel {
    /// Creates a channel over shared web state.
    pub fn new(state: Arc<WebUiState>) -> Self {
        Self { state }
    }
}

impl UiChannel for WebUiChannel {
    fn prune(&mut self) {
        self.state
            .subscribers
            .lock()
            .unwrap()
            .retain(|tx| !tx.is_closed());
    }

    fn try_recv(&mut self) -> Option<UiText> {
        self.state.inbound.lock().unwrap().pop_front()
    }

    fn broadcast(&mut self, snapshot: &StatusSnapshot) {
        *self.state.latest.lock().unwrap() = *snapshot;
        for tx in self.state.subscribers.lock().unwrap().iter() {
            let _ = tx.send(*snapshot);
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/status - Returns the latest snapshot
async fn get_status(State(state): State<Arc<WebUiState>>) -> Json<ApiResponse<StatusSnapshot>> {
    Json(ApiResponse::ok(state.latest()))
}

/// GET /api/events - Long-poll for the next snapshot broadcast
async fn get_events(State(state): State<Arc<WebUiState>>) -> Json<ApiResponse<StatusSnapshot>> {
    let mut rx = state.subscribe();
    let snapshot = match tokio::time::timeout(EVENTS_TIMEOUT, rx.recv()).await {
        Ok(Some(snapshot)) => snapshot,
        _ => state.latest(),
    };
    Json(ApiResponse::ok(snapshot))
}

/// POST /api/command - Submit one command token
///
/// Body is the raw token, e.g. `down` or `slider-128`. Unknown tokens are
/// accepted too; the controller answers them with a snapshot and nothing
/// else.
async fn post_command(
    State(state): State<Arc<WebUiState>>,
    body: String,
) -> Json<ApiResponse<CommandResponse>> {
    state.push_command(&body);
    Json(ApiResponse::ok(CommandResponse::accepted("queued")))
}

/// GET / - Serve the web UI
async fn index() -> impl IntoResponse {
    Html(include_str!("../../www/index.html"))
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: ([0, 0, 0, 0], 8080).into(),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<WebUiState>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        // API routes
        .route("/api/status", get(get_status))
        .route("/api/events", get(get_events))
        .route("/api/command", post(post_command))
        // Web UI
        .route("/", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(state);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server over the given shared UI state.
///
/// This function blocks until the server is shut down. The coordinator loop
/// runs elsewhere, holding the [`WebUiChannel`] end of the same state.
pub async fn run_server(
    state: Arc<WebUiState>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    println!("[HTTP] Web UI listening on http://{}", config.addr);

    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_command_truncates_to_channel_limit() {
        let state = Arc::new(WebUiState::new());
        state.push_command(&"y".repeat(200));

        let mut channel = WebUiChannel::new(Arc::clone(&state));
        let text = channel.try_recv().unwrap();
        assert_eq!(text.len(), crate::traits::UI_COMMAND_MAX);
    }

    #[test]
    fn channel_queue_is_fifo() {
        let state = Arc::new(WebUiState::new());
        state.push_command("down");
        state.push_command("stop");

        let mut channel = WebUiChannel::new(Arc::clone(&state));
        assert_eq!(channel.try_recv().unwrap().as_str(), "down");
        assert_eq!(channel.try_recv().unwrap().as_str(), "stop");
        assert!(channel.try_recv().is_none());
    }

    #[test]
    fn broadcast_updates_latest_and_subscribers() {
        let state = Arc::new(WebUiState::new());
        let mut rx = state.subscribe();
        let mut channel = WebUiChannel::new(Arc::clone(&state));

        let snapshot = StatusSnapshot {
            controller_state: 2,
            rpm: 100,
            ..Default::default()
        };
        channel.broadcast(&snapshot);

        assert_eq!(state.latest(), snapshot);
        assert_eq!(rx.try_recv().unwrap(), snapshot);
    }

    #[test]
    fn prune_drops_closed_subscribers() {
        let state = Arc::new(WebUiState::new());
        let rx = state.subscribe();
        drop(rx);
        let mut channel = WebUiChannel::new(Arc::clone(&state));

        channel.prune();
        assert!(state.subscribers.lock().unwrap().is_empty());
    }
}
