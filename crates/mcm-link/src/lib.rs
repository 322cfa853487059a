//! MCM Link - Realtime channel to the monitor controller.
//!
//! This crate defines the JSON wire protocol spoken over the controller's
//! `/ws` endpoint and the reconnecting client that carries it.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod protocol;
pub mod reconnect;

pub use client::{Link, LinkEvent, LinkHandle};
pub use endpoint::endpoint_from_origin;
pub use error::{LinkError, LinkResult};
pub use protocol::{decode_snapshot, encode_command};
pub use reconnect::{Backoff, ReconnectTracker};
