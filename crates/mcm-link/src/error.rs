//! Link error types.

use thiserror::Error;

/// Link error type.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] mcm_core::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unsupported origin scheme: {0}")]
    InvalidOrigin(String),
}

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;
