//! Connection lifecycle and its status line.

use serde::{Deserialize, Serialize};

/// Lifecycle of the realtime link to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// First attempt in progress
    #[default]
    Connecting,
    /// Link open; commands are sent
    Connected,
    /// Link lost; a retry is scheduled
    Reconnecting,
    /// Transport reported an error; the close that follows schedules the retry
    Failed,
}

/// How a status line should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Warn,
    Error,
}

/// Status text and style for a connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub label: &'static str,
    pub severity: Severity,
}

impl ConnectionState {
    /// Status line for this state.
    #[must_use]
    pub fn status(self) -> StatusView {
        let (label, severity) = match self {
            Self::Connecting => ("Connecting...", Severity::Warn),
            Self::Connected => ("Connected", Severity::Ok),
            Self::Reconnecting => ("Reconnecting...", Severity::Warn),
            Self::Failed => ("Connection Error", Severity::Error),
        };
        StatusView { label, severity }
    }
}
