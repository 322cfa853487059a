//! Wire format for commands and snapshots.
//!
//! Commands go out as one JSON object per text frame, tagged by `type`.
//! Snapshots come in as one JSON object with the controller's integer codes,
//! which are mapped onto the semantic types from `mcm-core` here.

use serde::{Deserialize, Serialize};

use mcm_core::snapshot::{ChannelMode, ChannelStrip, ControlSnapshot, ModeAxis};
use mcm_core::OutboundCommand;

use crate::error::LinkResult;

/// Snapshot exactly as the controller sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
struct WireSnapshot {
    /// 0=None, 1=Mute, 2=Solo
    primary: u8,
    /// Same encoding as `primary`
    compare: u8,
    master_volume: f32,
    #[serde(default)]
    channels: Vec<WireChannel>,
    dim: bool,
    cut: bool,
    mono: bool,
    low_boost: bool,
    high_boost: bool,
    lfe_add_10db: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireChannel {
    name: String,
    /// 0=Normal, 1=Muted, 2=Soloed
    state: u8,
    #[serde(default)]
    index: usize,
    #[serde(default)]
    is_sub: bool,
}

impl WireSnapshot {
    fn into_snapshot(self) -> LinkResult<ControlSnapshot> {
        let channels = self
            .channels
            .into_iter()
            .map(|ch| {
                Ok(ChannelStrip {
                    state: ChannelMode::from_code(ch.state)?,
                    name: ch.name,
                    index: ch.index,
                    is_sub: ch.is_sub,
                })
            })
            .collect::<mcm_core::Result<Vec<_>>>()?;

        let snapshot = ControlSnapshot {
            primary_mode: ModeAxis::from_code(self.primary)?,
            compare_mode: ModeAxis::from_code(self.compare)?,
            master_volume: self.master_volume,
            channels,
            dim: self.dim,
            cut: self.cut,
            mono: self.mono,
            low_boost: self.low_boost,
            high_boost: self.high_boost,
            lfe_add_10db: self.lfe_add_10db,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
impl From<&ControlSnapshot> for WireSnapshot {
    fn from(snapshot: &ControlSnapshot) -> Self {
        Self {
            primary: snapshot.primary_mode.code(),
            compare: snapshot.compare_mode.code(),
            master_volume: snapshot.master_volume,
            channels: snapshot
                .channels
                .iter()
                .map(|ch| WireChannel {
                    name: ch.name.clone(),
                    state: ch.state.code(),
                    index: ch.index,
                    is_sub: ch.is_sub,
                })
                .collect(),
            dim: snapshot.dim,
            cut: snapshot.cut,
            mono: snapshot.mono,
            low_boost: snapshot.low_boost,
            high_boost: snapshot.high_boost,
            lfe_add_10db: snapshot.lfe_add_10db,
        }
    }
}

/// Serialize a command for one text frame.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode_command(command: &OutboundCommand) -> LinkResult<String> {
    Ok(serde_json::to_string(command)?)
}

/// Parse and validate a snapshot frame from the controller.
///
/// # Errors
/// Returns an error for non-JSON input, missing fields, unknown integer
/// codes, or a snapshot that breaks its invariants.
pub fn decode_snapshot(text: &str) -> LinkResult<ControlSnapshot> {
    serde_json::from_str::<WireSnapshot>(text)?.into_snapshot()
}

/// Serialize a snapshot in the controller's format.
#[cfg(test)]
pub(crate) fn encode_snapshot(snapshot: &ControlSnapshot) -> LinkResult<String> {
    Ok(serde_json::to_string(&WireSnapshot::from(snapshot))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::{Value, json};

    use crate::error::LinkError;

    fn wire(overrides: &Value) -> String {
        let mut base = json!({
            "primary": 2,
            "compare": 0,
            "solo_mask": 0,
            "mute_mask": 0,
            "master_volume": 0.42,
            "channels": [{ "name": "L", "index": 0, "state": 0, "is_sub": false }],
            "dim": false,
            "cut": false,
            "mono": false,
            "low_boost": false,
            "high_boost": false,
            "lfe_add_10db": false
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base.to_string()
    }

    #[test]
    fn test_command_wire_shapes() {
        let cases = [
            (OutboundCommand::ToggleSolo, json!({ "type": "ToggleSolo" })),
            (OutboundCommand::ToggleLfeAdd10dB, json!({ "type": "ToggleLfeAdd10dB" })),
            (OutboundCommand::SetVolume { value: 0.5 }, json!({ "type": "SetVolume", "value": 0.5 })),
            (
                OutboundCommand::ChannelClick { channel: "C".into() },
                json!({ "type": "ChannelClick", "channel": "C" }),
            ),
            (
                OutboundCommand::GroupClick { group: "front".into() },
                json!({ "type": "GroupClick", "group": "front" }),
            ),
            (
                OutboundCommand::GroupDial { group: "front".into(), direction: -1 },
                json!({ "type": "GroupDial", "group": "front", "direction": -1 }),
            ),
        ];

        for (command, expected) in cases {
            let text = encode_command(&command).unwrap();
            let value: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn test_decode_maps_integer_codes() {
        let snapshot = decode_snapshot(&wire(&json!({
            "compare": 1,
            "channels": [
                { "name": "L", "index": 0, "state": 2, "is_sub": false },
                { "name": "LFE", "index": 3, "state": 1, "is_sub": true }
            ],
            "dim": true
        })))
        .unwrap();

        assert_eq!(snapshot.primary_mode, ModeAxis::Solo);
        assert_eq!(snapshot.compare_mode, ModeAxis::Mute);
        assert!((snapshot.master_volume - 0.42).abs() < f32::EPSILON);
        assert_eq!(snapshot.channels[0].state, ChannelMode::Soloed);
        assert_eq!(snapshot.channels[1].name, "LFE");
        assert!(snapshot.channels[1].is_sub);
        assert!(snapshot.dim);
    }

    #[test]
    fn test_decode_tolerates_missing_channels() {
        let mut value: Value = serde_json::from_str(&wire(&json!({}))).unwrap();
        value.as_object_mut().unwrap().remove("channels");

        let snapshot = decode_snapshot(&value.to_string()).unwrap();
        assert!(snapshot.channels.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        assert_matches!(decode_snapshot("not json"), Err(LinkError::Json(_)));
        assert_matches!(decode_snapshot("{}"), Err(LinkError::Json(_)));
        assert_matches!(
            decode_snapshot(&wire(&json!({ "primary": 7 }))),
            Err(LinkError::Snapshot(mcm_core::Error::InvalidModeCode(7)))
        );
        assert_matches!(
            decode_snapshot(&wire(&json!({ "channels": [{ "name": "L", "state": 5 }] }))),
            Err(LinkError::Snapshot(mcm_core::Error::InvalidChannelCode(5)))
        );
        assert_matches!(
            decode_snapshot(&wire(&json!({ "master_volume": 3.0 }))),
            Err(LinkError::Snapshot(mcm_core::Error::InvalidVolume(_)))
        );
    }

    #[test]
    fn test_snapshot_encoding_matches_controller_format() {
        let snapshot = decode_snapshot(&wire(&json!({ "mono": true }))).unwrap();
        let value: Value = serde_json::from_str(&encode_snapshot(&snapshot).unwrap()).unwrap();

        assert_eq!(value["primary"], 2);
        assert_eq!(value["mono"], true);
        assert_eq!(value["channels"][0]["name"], "L");
        assert_eq!(decode_snapshot(&value.to_string()).unwrap(), snapshot);
    }
}
