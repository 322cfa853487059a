//! Projection of a controller snapshot onto UI facts.
//!
//! A [`Projection`] is a pure function of one [`ControlSnapshot`]. It never
//! looks at a previous projection, so applying the same snapshot twice gives
//! the same facts, and every rendering of a logical control reads the same
//! entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command::ButtonKind;
use crate::snapshot::{ChannelMode, ControlSnapshot, ModeAxis};

/// Sweep of the volume knob arc at 100%.
pub const KNOB_SWEEP_DEGREES: f32 = 270.0;

/// Visual state of the Solo or Mute mode button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeIndicator {
    #[default]
    Off,
    /// Latched as the primary mode
    Steady,
    /// Active as the compare mode
    Blinking,
}

impl ModeIndicator {
    fn for_axis(axis: ModeAxis, snapshot: &ControlSnapshot) -> Self {
        // Compare is the transient layer drawn on top of the latched mode.
        if snapshot.compare_mode == axis {
            Self::Blinking
        } else if snapshot.primary_mode == axis {
            Self::Steady
        } else {
            Self::Off
        }
    }
}

/// Global on/off controls that may be rendered on several pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleControl {
    Dim,
    Cut,
    Mono,
    LowBoost,
    HighBoost,
    #[serde(rename = "lfe_add_10db")]
    LfeAdd10dB,
}

impl ToggleControl {
    pub const ALL: [Self; 6] =
        [Self::Dim, Self::Cut, Self::Mono, Self::LowBoost, Self::HighBoost, Self::LfeAdd10dB];

    fn read(self, snapshot: &ControlSnapshot) -> bool {
        match self {
            Self::Dim => snapshot.dim,
            Self::Cut => snapshot.cut,
            Self::Mono => snapshot.mono,
            Self::LowBoost => snapshot.low_boost,
            Self::HighBoost => snapshot.high_boost,
            Self::LfeAdd10dB => snapshot.lfe_add_10db,
        }
    }
}

impl ButtonKind {
    /// The global toggle this button mirrors, if it is not a mode button.
    #[must_use]
    pub fn toggle_control(self) -> Option<ToggleControl> {
        match self {
            Self::Solo | Self::Mute => None,
            Self::Dim => Some(ToggleControl::Dim),
            Self::Cut => Some(ToggleControl::Cut),
            Self::Mono => Some(ToggleControl::Mono),
            Self::LowBoost => Some(ToggleControl::LowBoost),
            Self::HighBoost => Some(ToggleControl::HighBoost),
            Self::LfeAdd10dB => Some(ToggleControl::LfeAdd10dB),
        }
    }
}

/// Everything the surface shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub solo: ModeIndicator,
    pub mute: ModeIndicator,
    /// Master volume as a whole percentage (0 - 100)
    pub volume_percent: u8,
    /// Channel display states by name
    pub channels: BTreeMap<String, ChannelMode>,
    /// Global toggle states
    pub toggles: BTreeMap<ToggleControl, bool>,
}

impl Projection {
    /// Project a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &ControlSnapshot) -> Self {
        let channels =
            snapshot.channels.iter().map(|c| (c.name.clone(), c.state)).collect();
        let toggles = ToggleControl::ALL.iter().map(|t| (*t, t.read(snapshot))).collect();

        Self {
            solo: ModeIndicator::for_axis(ModeAxis::Solo, snapshot),
            mute: ModeIndicator::for_axis(ModeAxis::Mute, snapshot),
            volume_percent: volume_percent(snapshot.master_volume),
            channels,
            toggles,
        }
    }

    /// Display state for a channel button. Unknown channels render Normal.
    #[must_use]
    pub fn channel(&self, name: &str) -> ChannelMode {
        self.channels.get(name).copied().unwrap_or_default()
    }

    /// Whether a global toggle is on.
    #[must_use]
    pub fn toggle(&self, control: ToggleControl) -> bool {
        self.toggles.get(&control).copied().unwrap_or(false)
    }

    /// Whether a button should render as active in any form.
    #[cfg(test)]
    fn button_active(&self, button: ButtonKind) -> bool {
        match button {
            ButtonKind::Solo => self.solo != ModeIndicator::Off,
            ButtonKind::Mute => self.mute != ModeIndicator::Off,
            other => other.toggle_control().is_some_and(|t| self.toggle(t)),
        }
    }

    /// Text for the volume display, e.g. "42%".
    #[must_use]
    pub fn volume_label(&self) -> String {
        format!("{}%", self.volume_percent)
    }

    /// Angle of the filled knob arc.
    #[must_use]
    pub fn knob_degrees(&self) -> f32 {
        f32::from(self.volume_percent) * KNOB_SWEEP_DEGREES / 100.0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn volume_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ChannelStrip;

    fn snapshot() -> ControlSnapshot {
        ControlSnapshot {
            primary_mode: ModeAxis::Solo,
            compare_mode: ModeAxis::None,
            master_volume: 0.42,
            channels: vec![ChannelStrip::new("L", ChannelMode::Normal, 0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_solo_primary_scenario() {
        let projection = Projection::from_snapshot(&snapshot());

        assert_eq!(projection.solo, ModeIndicator::Steady);
        assert_eq!(projection.mute, ModeIndicator::Off);
        assert_eq!(projection.volume_label(), "42%");
        assert_eq!(projection.channel("L"), ChannelMode::Normal);
        assert!(ToggleControl::ALL.iter().all(|t| !projection.toggle(*t)));
    }

    #[test]
    fn test_compare_mode_blinks() {
        let snap = ControlSnapshot {
            primary_mode: ModeAxis::Solo,
            compare_mode: ModeAxis::Mute,
            ..snapshot()
        };
        let projection = Projection::from_snapshot(&snap);

        assert_eq!(projection.solo, ModeIndicator::Steady);
        assert_eq!(projection.mute, ModeIndicator::Blinking);
        assert!(projection.button_active(ButtonKind::Mute));
    }

    #[test]
    fn test_same_axis_in_both_slots_renders_blinking() {
        let snap = ControlSnapshot {
            primary_mode: ModeAxis::Mute,
            compare_mode: ModeAxis::Mute,
            ..snapshot()
        };
        let projection = Projection::from_snapshot(&snap);

        assert_eq!(projection.mute, ModeIndicator::Blinking);
        assert_eq!(projection.solo, ModeIndicator::Off);
    }

    #[test]
    fn test_unknown_channel_renders_normal() {
        let snap = ControlSnapshot {
            channels: vec![ChannelStrip::new("R", ChannelMode::Soloed, 1)],
            ..snapshot()
        };
        let projection = Projection::from_snapshot(&snap);

        assert_eq!(projection.channel("R"), ChannelMode::Soloed);
        assert_eq!(projection.channel("Ls"), ChannelMode::Normal);
    }

    #[test]
    fn test_toggles_mirror_snapshot() {
        let snap = ControlSnapshot { dim: true, lfe_add_10db: true, ..snapshot() };
        let projection = Projection::from_snapshot(&snap);

        assert!(projection.toggle(ToggleControl::Dim));
        assert!(projection.toggle(ToggleControl::LfeAdd10dB));
        assert!(!projection.toggle(ToggleControl::Cut));
        assert!(projection.button_active(ButtonKind::Dim));
        assert!(!projection.button_active(ButtonKind::Mono));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let snap = ControlSnapshot { cut: true, mono: true, ..snapshot() };

        assert_eq!(Projection::from_snapshot(&snap), Projection::from_snapshot(&snap));
    }

    #[test]
    fn test_knob_arc() {
        let full = ControlSnapshot { master_volume: 1.0, ..snapshot() };
        let half = ControlSnapshot { master_volume: 0.5, ..snapshot() };

        assert!((Projection::from_snapshot(&full).knob_degrees() - 270.0).abs() < f32::EPSILON);
        assert!((Projection::from_snapshot(&half).knob_degrees() - 135.0).abs() < f32::EPSILON);
    }
}
