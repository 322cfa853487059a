//! Group dial: vertical drag as an incremental rotary encoder, plus tap.
//!
//! Each time the pointer travels more than the threshold from the reference
//! point, one tick is emitted and the reference moves to the pointer. A tap
//! is a click with no tick in between.
//!
//! Platforms synthesize a click after a drag ends. The dragged flag therefore
//! outlives the release by `click_suppress`, and the click handler reads it.
//! This only works if the platform delivers the synthesized click within that
//! window after the pointer-up.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::command::{DialDirection, Intent};

/// Pixels of travel per tick.
pub const DEFAULT_DIAL_THRESHOLD: f32 = 15.0;

/// How long after release a click is still treated as the tail of a drag.
pub const DEFAULT_CLICK_SUPPRESS: Duration = Duration::from_millis(50);

/// Tunables for [`GroupDial`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialSettings {
    pub threshold: f32,
    pub click_suppress: Duration,
}

impl Default for DialSettings {
    fn default() -> Self {
        Self { threshold: DEFAULT_DIAL_THRESHOLD, click_suppress: DEFAULT_CLICK_SUPPRESS }
    }
}

#[derive(Debug, Clone)]
struct DialSession {
    group: String,
    reference_y: f32,
}

/// Threshold dial interpreter.
#[derive(Debug, Clone, Default)]
pub struct GroupDial {
    settings: DialSettings,
    session: Option<DialSession>,
    dragged: bool,
    released_at: Option<Instant>,
}

impl GroupDial {
    #[must_use]
    pub fn new(settings: DialSettings) -> Self {
        Self { settings, ..Default::default() }
    }

    /// Press on the dial bound to `group`.
    pub fn press(&mut self, group: &str, y: f32) {
        self.session = Some(DialSession { group: group.to_string(), reference_y: y });
        self.dragged = false;
        self.released_at = None;
    }

    /// Feed a move sample. Returns a dial tick once the travel exceeds the
    /// threshold, then re-arms at the current position.
    pub fn moved(&mut self, y: f32) -> Option<Intent> {
        let session = self.session.as_mut()?;
        let delta = session.reference_y - y;

        if delta.abs() <= self.settings.threshold {
            return None;
        }

        let direction =
            if delta > 0.0 { DialDirection::Clockwise } else { DialDirection::CounterClockwise };
        debug!(group = %session.group, ?direction, "Group dial tick");

        session.reference_y = y;
        self.dragged = true;

        Some(Intent::GroupDial { group: session.group.clone(), direction })
    }

    /// Release the dial at `now`.
    pub fn release(&mut self, now: Instant) {
        self.session = None;
        self.released_at = Some(now);
    }

    /// A click landed on the dial bound to `group`.
    ///
    /// Returns a group click only if no tick happened in the current or
    /// just-finished gesture.
    #[must_use]
    pub fn click(&self, group: &str, now: Instant) -> Option<Intent> {
        if self.is_dragged(now) {
            debug!(group, "Suppressed click after dial drag");
            return None;
        }
        Some(Intent::GroupClick(group.to_string()))
    }

    /// Whether the dragged flag is still visible at `now`.
    #[must_use]
    pub fn is_dragged(&self, now: Instant) -> bool {
        self.dragged
            && self
                .released_at
                .is_none_or(|at| now.saturating_duration_since(at) < self.settings.click_suppress)
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
