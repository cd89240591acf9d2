/*
[INPUT]:  Error sources (HTTP transport, API responses, serialization, auth, local files)
[OUTPUT]: Structured error type with user-facing detail text
[POS]:    Error handling layer - unified error type for the client crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the SoliForge client
#[derive(Error, Debug)]
pub enum SoliforgeError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Session token is missing, expired or was rejected with 401
    #[error("Session expired, please sign in again")]
    Unauthenticated,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local file access failed (contract upload)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Task id that cannot be addressed as a single path segment
    #[error("Invalid task id: {0:?}")]
    InvalidTaskId(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SoliforgeError {
    /// Check if error indicates the session is no longer valid
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SoliforgeError::Unauthenticated)
    }

    /// Create an API error from a status code and a raw response body.
    ///
    /// FastAPI wraps messages as `{"detail": "..."}`; validation failures carry
    /// a list under `detail`, which is kept as compact JSON.
    pub fn api_error(status: StatusCode, body: &str) -> Self {
        SoliforgeError::Api {
            status: status.as_u16(),
            message: extract_detail(body).unwrap_or_else(|| fallback_message(status, body)),
        }
    }

    /// Text suitable for an alert or an error line in the UI
    pub fn detail(&self) -> String {
        match self {
            SoliforgeError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SoliforgeError::Api { status, .. } => Some(*status),
            SoliforgeError::Unauthenticated => Some(401),
            _ => None,
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

/// Result type alias for SoliForge operations
pub type Result<T> = std::result::Result<T, SoliforgeError>;
