//! JSON response wrappers for the web API.

use serde::{Deserialize, Serialize};

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Command result response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the command text was accepted into the queue
    pub accepted: bool,
    /// Result details
    pub result: String,
}

impl CommandResponse {
    /// Create an accepted response with details
    pub fn accepted(result: impl Into<String>) -> Self {
        Self {
            accepted: true,
            result: result.into(),
        }
    }
}
