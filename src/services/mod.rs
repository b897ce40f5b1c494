//! Network services for the web UI channel.
//!
//! The `web` feature provides an axum-based HTTP server that plays the UI
//! collaborator role for the coordinator: handlers enqueue command text and
//! read the snapshot the coordinator last broadcast, while the coordinator
//! holds the [`WebUiChannel`] end of the same shared state.
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_winch::services::{run_server, WebServerConfig, WebUiChannel, WebUiState};
//!
//! let state = Arc::new(WebUiState::new());
//! let mut ui = WebUiChannel::new(Arc::clone(&state));
//!
//! // coordinator thread: coordinator.poll(now_ms, &mut ui, &mut bus)
//! // tokio task: run_server(state, WebServerConfig::default()).await
//! ```

pub mod api;
pub mod web;

pub use api::*;
pub use web::*;
