//! Error types for the Zotero client.

use std::time::Duration;

/// Errors that can occur when interacting with the Zotero API.
#[derive(Debug, thiserror::Error)]
pub enum ZoteroError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Zotero API returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The API key was rejected or lacks access to the library.
    #[error("Authentication required: set ZOTERO_API_KEY to a key with access to this library, or enable ZOTERO_LOCAL")]
    AuthRequired,

    /// Rate limited by the Zotero API (HTTP 429).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// The item changed on the server since it was read (HTTP 412).
    #[error("Item was modified since version {version}; fetch it again and retry")]
    PreconditionFailed { version: u64 },

    /// Failed to parse API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Missing or malformed tool/CLI arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for Results using [`ZoteroError`].
pub type Result<T> = std::result::Result<T, ZoteroError>;
