//! Commands sent from the surface to the controller.
//!
//! Every user intent becomes exactly one [`OutboundCommand`]. Nothing is
//! batched or deduplicated here; values are clamped by the gesture
//! interpreters before they reach this layer.

use serde::{Deserialize, Serialize};

/// Buttons that toggle a controller mode or effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Solo,
    Mute,
    Dim,
    Cut,
    Mono,
    LowBoost,
    HighBoost,
    #[serde(rename = "lfe_add_10db")]
    LfeAdd10dB,
}

impl ButtonKind {
    /// Every toggle button, in panel order.
    pub const ALL: [Self; 8] = [
        Self::Solo,
        Self::Mute,
        Self::Dim,
        Self::Cut,
        Self::Mono,
        Self::LowBoost,
        Self::HighBoost,
        Self::LfeAdd10dB,
    ];

    /// The wire tag of the command this button sends.
    #[cfg(test)]
    fn command_tag(self) -> &'static str {
        match self {
            Self::Solo => "ToggleSolo",
            Self::Mute => "ToggleMute",
            Self::Dim => "ToggleDim",
            Self::Cut => "ToggleCut",
            Self::Mono => "ToggleMono",
            Self::LowBoost => "ToggleLowBoost",
            Self::HighBoost => "ToggleHighBoost",
            Self::LfeAdd10dB => "ToggleLfeAdd10dB",
        }
    }
}

/// Rotation direction of a group dial tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialDirection {
    /// Drag up
    Clockwise,
    /// Drag down
    CounterClockwise,
}

impl DialDirection {
    /// Signed step sent on the wire: +1 or -1.
    #[must_use]
    pub fn step(self) -> i8 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

/// A discrete user intent produced by the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// A toggle button was pressed
    Press(ButtonKind),
    /// A channel button was clicked
    ChannelClick(String),
    /// The master volume knob settled on a new value
    SetVolume(f32),
    /// A group dial was tapped without dragging
    GroupClick(String),
    /// A group dial was turned one step
    GroupDial { group: String, direction: DialDirection },
}

/// A command message for the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundCommand {
    ToggleSolo,
    ToggleMute,
    ToggleDim,
    ToggleCut,
    ToggleMono,
    ToggleLowBoost,
    ToggleHighBoost,
    ToggleLfeAdd10dB,
    SetVolume { value: f32 },
    ChannelClick { channel: String },
    GroupClick { group: String },
    GroupDial { group: String, direction: i8 },
}

/// Turn an intent into the command that carries it.
#[must_use]
pub fn encode(intent: Intent) -> OutboundCommand {
    match intent {
        Intent::Press(button) => match button {
            ButtonKind::Solo => OutboundCommand::ToggleSolo,
            ButtonKind::Mute => OutboundCommand::ToggleMute,
            ButtonKind::Dim => OutboundCommand::ToggleDim,
            ButtonKind::Cut => OutboundCommand::ToggleCut,
            ButtonKind::Mono => OutboundCommand::ToggleMono,
            ButtonKind::LowBoost => OutboundCommand::ToggleLowBoost,
            ButtonKind::HighBoost => OutboundCommand::ToggleHighBoost,
            ButtonKind::LfeAdd10dB => OutboundCommand::ToggleLfeAdd10dB,
        },
        Intent::ChannelClick(channel) => OutboundCommand::ChannelClick { channel },
        Intent::SetVolume(value) => OutboundCommand::SetVolume { value },
        Intent::GroupClick(group) => OutboundCommand::GroupClick { group },
        Intent::GroupDial { group, direction } => {
            OutboundCommand::GroupDial { group, direction: direction.step() }
        }
    }
}

impl From<Intent> for OutboundCommand {
    fn from(intent: Intent) -> Self {
        encode(intent)
    }
}

impl OutboundCommand {
    /// The `type` tag this command carries on the wire.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ToggleSolo => "ToggleSolo",
            Self::ToggleMute => "ToggleMute",
            Self::ToggleDim => "ToggleDim",
            Self::ToggleCut => "ToggleCut",
            Self::ToggleMono => "ToggleMono",
            Self::ToggleLowBoost => "ToggleLowBoost",
            Self::ToggleHighBoost => "ToggleHighBoost",
            Self::ToggleLfeAdd10dB => "ToggleLfeAdd10dB",
            Self::SetVolume { .. } => "SetVolume",
            Self::ChannelClick { .. } => "ChannelClick",
            Self::GroupClick { .. } => "GroupClick",
            Self::GroupDial { .. } => "GroupDial",
        }
    }
}
