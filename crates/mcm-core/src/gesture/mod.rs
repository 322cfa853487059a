//! Interpreters for continuous pointer input.
//!
//! Both interpreters are plain state machines: the adapter feeds them
//! press/move/release coordinates and forwards whatever [`Intent`] they
//! return. Screen-space Y grows downward, so dragging up produces a positive
//! delta.
//!
//! [`Intent`]: crate::command::Intent

mod dial;
mod volume;

pub use dial::{DEFAULT_CLICK_SUPPRESS, DEFAULT_DIAL_THRESHOLD, DialSettings, GroupDial};
pub use volume::{DEFAULT_SENSITIVITY, FALLBACK_BASELINE, VolumeDrag, quantize_volume};
