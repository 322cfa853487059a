//! Error types for MCM core.

use thiserror::Error;

/// Core error type for snapshot validation and code mapping.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Invalid mode code: {0} (expected 0, 1 or 2)")]
    InvalidModeCode(u8),

    #[error("Invalid channel state code: {0} (expected 0, 1 or 2)")]
    InvalidChannelCode(u8),

    #[error("Invalid volume value: {0} (must be 0.0-1.0)")]
    InvalidVolume(f32),

    #[error("Duplicate channel name: {0}")]
    DuplicateChannel(String),
}

/// Result type alias for MCM core operations.
pub type Result<T> = std::result::Result<T, Error>;
