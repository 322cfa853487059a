//! MCM Remote - Headless control surface for the monitor controller.
//!
//! This crate wires the pure surface logic from `mcm-core` to the realtime
//! link from `mcm-link`. A host front end feeds pointer and button events in
//! as JSON lines and renders the projected state it gets back.

pub mod bridge;
pub mod config;
pub mod state;
pub mod surface;

pub use config::Config;
pub use state::{SurfaceState, SurfaceView};
pub use surface::{CommandSink, ControlSurface, Haptic, InputEvent, SurfaceSettings};
