//! Reconnect backoff and connection state transitions.

use std::time::Duration;

use mcm_core::ConnectionState;
use tracing::debug;

/// First retry delay, and the delay after every successful open.
pub const BACKOFF_FLOOR: Duration = Duration::from_millis(1000);
/// Growth applied after each scheduled retry.
pub const BACKOFF_FACTOR: f64 = 1.5;
/// Upper bound on the retry delay.
pub const BACKOFF_CAP: Duration = Duration::from_millis(10_000);

/// Multiplicative backoff with a floor and a cap. Retries are unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    floor: Duration,
    factor: f64,
    cap: Duration,
    current: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_FLOOR, BACKOFF_FACTOR, BACKOFF_CAP)
    }
}

impl Backoff {
    /// Create a backoff. A factor below 1.0 is treated as 1.0 and a cap
    /// below the floor as the floor.
    #[must_use]
    pub fn new(floor: Duration, factor: f64, cap: Duration) -> Self {
        Self { floor, factor: factor.max(1.0), cap: cap.max(floor), current: floor }
    }

    /// Delay for the retry being scheduled now. Grows the next one.
    ///
    /// Growth that does not fit in a [`Duration`] saturates at the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = Duration::try_from_secs_f64(self.current.as_secs_f64() * self.factor)
            .map_or(self.cap, |grown| grown.min(self.cap));
        delay
    }

    /// Back to the floor.
    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

/// Owns the link's [`ConnectionState`] and the backoff that goes with it.
///
/// An error only changes the visible state. The close that always follows it
/// is the one place a retry gets scheduled.
#[derive(Debug, Clone)]
pub struct ReconnectTracker {
    state: ConnectionState,
    backoff: Backoff,
}

impl ReconnectTracker {
    #[must_use]
    pub fn new(backoff: Backoff) -> Self {
        Self { state: ConnectionState::Connecting, backoff }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The channel opened.
    pub fn on_open(&mut self) -> ConnectionState {
        self.backoff.reset();
        self.state = ConnectionState::Connected;
        self.state
    }

    /// The transport reported an error.
    pub fn on_error(&mut self) -> ConnectionState {
        self.state = ConnectionState::Failed;
        self.state
    }

    /// The channel closed. Returns the delay before the next attempt.
    pub fn on_close(&mut self) -> Duration {
        self.state = ConnectionState::Reconnecting;
        let delay = self.backoff.next_delay();
        debug!(delay_ms = delay.as_millis(), "Reconnect scheduled");
        delay
    }
}
