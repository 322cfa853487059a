//! Master volume knob: vertical drag to a continuous value.

use tracing::trace;

use crate::command::Intent;

/// Volume change per pixel of vertical drag.
pub const DEFAULT_SENSITIVITY: f32 = 0.005;

/// Baseline used when no snapshot has been received yet.
pub const FALLBACK_BASELINE: f32 = 0.5;

/// Clamp a volume into 0.0-1.0 and round it to the nearest hundredth.
#[must_use]
pub fn quantize_volume(value: f32) -> f32 {
    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
struct DragSession {
    reference_y: f32,
    baseline: f32,
    last_value: f32,
}

/// Linear drag interpreter for the volume knob.
#[derive(Debug, Clone)]
pub struct VolumeDrag {
    sensitivity: f32,
    session: Option<DragSession>,
}

impl Default for VolumeDrag {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl VolumeDrag {
    #[must_use]
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity, session: None }
    }

    /// Start a drag at `y`.
    ///
    /// `committed` is the volume from the latest controller snapshot; the
    /// drag is relative to it rather than to anything this surface sent.
    pub fn press(&mut self, y: f32, committed: Option<f32>) {
        let baseline = committed.unwrap_or(FALLBACK_BASELINE);
        self.session =
            Some(DragSession { reference_y: y, baseline, last_value: quantize_volume(baseline) });
    }

    /// Feed a move sample. Returns a volume intent when the quantized value
    /// changes; samples without an active drag are ignored.
    pub fn moved(&mut self, y: f32) -> Option<Intent> {
        let session = self.session.as_mut()?;
        let raw = session.baseline + (session.reference_y - y) * self.sensitivity;
        let value = quantize_volume(raw);

        if (value - session.last_value).abs() < f32::EPSILON {
            return None;
        }

        trace!(value, "Volume drag");
        session.last_value = value;
        Some(Intent::SetVolume(value))
    }

    /// End the drag. Nothing further is sent.
    pub fn release(&mut self) {
        self.session = None;
    }

    #[cfg(test)]
    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_drag_up_raises_volume() {
        let mut knob = VolumeDrag::default();
        knob.press(300.0, Some(0.5));

        assert_matches!(knob.moved(280.0), Some(Intent::SetVolume(v)) if (v - 0.6).abs() < 1e-6);
        assert_matches!(knob.moved(320.0), Some(Intent::SetVolume(v)) if (v - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_unchanged_quantized_value_is_not_sent() {
        let mut knob = VolumeDrag::default();
        knob.press(100.0, Some(0.5));

        // 0.5 + 0.5px * 0.005 rounds back to 0.50
        assert_eq!(knob.moved(99.5), None);
        assert!(knob.moved(98.0).is_some());
        assert_eq!(knob.moved(98.0), None);
    }

    #[test]
    fn test_clamps_at_the_ends() {
        let mut knob = VolumeDrag::default();
        knob.press(500.0, Some(0.9));

        assert_eq!(knob.moved(0.0), Some(Intent::SetVolume(1.0)));
        assert_eq!(knob.moved(-400.0), None);
        assert_eq!(knob.moved(1500.0), Some(Intent::SetVolume(0.0)));
    }

    #[test]
    fn test_fallback_baseline_without_snapshot() {
        let mut knob = VolumeDrag::default();
        knob.press(0.0, None);

        assert_eq!(knob.moved(-20.0), Some(Intent::SetVolume(0.6)));
    }

    #[test]
    fn test_move_after_release_is_ignored() {
        let mut knob = VolumeDrag::default();
        knob.press(0.0, Some(0.2));
        knob.release();

        assert!(!knob.is_dragging());
        assert_eq!(knob.moved(-100.0), None);
    }

    proptest! {
        #[test]
        fn prop_emitted_volume_is_clamped_and_quantized(
            baseline in 0.0f32..=1.0,
            start in -2000.0f32..2000.0,
            moves in proptest::collection::vec(-4000.0f32..4000.0, 1..32),
        ) {
            let mut knob = VolumeDrag::default();
            knob.press(start, Some(baseline));

            for y in moves {
                if let Some(Intent::SetVolume(v)) = knob.moved(y) {
                    prop_assert!((0.0..=1.0).contains(&v));
                    let hundredths = v * 100.0;
                    prop_assert!((hundredths - hundredths.round()).abs() < 1e-3);
                }
            }
        }
    }
}
