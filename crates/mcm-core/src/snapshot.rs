//! Controller state snapshot.
//!
//! The controller owns the true mixer state and pushes it to every surface as
//! a complete snapshot. A surface never patches a snapshot; each new one
//! replaces the previous one wholesale.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which Solo/Mute axis a mode slot is latched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeAxis {
    #[default]
    None,
    Solo,
    Mute,
}

impl ModeAxis {
    /// Map the controller's integer code onto a mode axis.
    ///
    /// The controller encodes `1` as the Mute axis and `2` as the Solo axis.
    ///
    /// # Errors
    /// Returns [`Error::InvalidModeCode`] for any code other than 0, 1 or 2.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Mute),
            2 => Ok(Self::Solo),
            other => Err(Error::InvalidModeCode(other)),
        }
    }

    /// The controller's integer code for this axis.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Mute => 1,
            Self::Solo => 2,
        }
    }
}

/// Display state of a single output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    #[default]
    Normal,
    Muted,
    Soloed,
}

impl ChannelMode {
    /// Map the controller's integer channel state onto a channel mode.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChannelCode`] for any code other than 0, 1 or 2.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Muted),
            2 => Ok(Self::Soloed),
            other => Err(Error::InvalidChannelCode(other)),
        }
    }

    /// The controller's integer code for this channel mode.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Muted => 1,
            Self::Soloed => 2,
        }
    }
}

/// One channel as reported by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStrip {
    /// Channel name, unique within a snapshot (e.g. "L", "C", "LFE")
    pub name: String,
    /// Current display state
    pub state: ChannelMode,
    /// Position in the controller's layout
    pub index: usize,
    /// Whether this is a subwoofer channel
    pub is_sub: bool,
}

impl ChannelStrip {
    /// Create a non-sub channel at the given layout position.
    #[must_use]
    pub fn new(name: &str, state: ChannelMode, index: usize) -> Self {
        Self { name: name.to_string(), state, index, is_sub: false }
    }
}

/// Complete mixer state as pushed by the controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ControlSnapshot {
    /// Latched (steady) mode axis
    pub primary_mode: ModeAxis,
    /// Transient (blinking) mode axis
    pub compare_mode: ModeAxis,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Channels in layout order
    pub channels: Vec<ChannelStrip>,
    pub dim: bool,
    pub cut: bool,
    pub mono: bool,
    pub low_boost: bool,
    pub high_boost: bool,
    pub lfe_add_10db: bool,
}

impl ControlSnapshot {
    /// Check the invariants a controller snapshot must hold.
    ///
    /// # Errors
    /// Returns an error if the master volume is outside 0.0-1.0 (or NaN) or
    /// if two channels share a name.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(Error::InvalidVolume(self.master_volume));
        }

        let mut seen = HashSet::with_capacity(self.channels.len());
        for channel in &self.channels {
            if !seen.insert(channel.name.as_str()) {
                return Err(Error::DuplicateChannel(channel.name.clone()));
            }
        }

        Ok(())
    }

    /// Look up a channel by name.
    #[cfg(test)]
    fn channel(&self, name: &str) -> Option<&ChannelStrip> {
        self.channels.iter().find(|c| c.name == name)
    }
}
