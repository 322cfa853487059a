//! MCM Core - Control surface domain model and gesture logic.
//!
//! This crate holds everything about the remote control surface that can be
//! expressed without I/O: the controller's state snapshot, the commands the
//! surface sends back, the projection of a snapshot onto UI facts, and the
//! interpreters that turn pointer movement into discrete intents.

pub mod command;
pub mod error;
pub mod gesture;
pub mod page;
pub mod projection;
pub mod snapshot;
pub mod status;

pub use command::{ButtonKind, DialDirection, Intent, OutboundCommand, encode};
pub use error::{Error, Result};
pub use gesture::{DialSettings, GroupDial, VolumeDrag};
pub use page::PageNavigator;
pub use projection::{ModeIndicator, Projection, ToggleControl};
pub use snapshot::{ChannelMode, ChannelStrip, ControlSnapshot, ModeAxis};
pub use status::{ConnectionState, Severity, StatusView};
