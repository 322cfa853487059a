//! The control surface context.
//!
//! [`ControlSurface`] owns every piece of per-surface state: the gesture
//! interpreters, the page navigator, and the observable [`SurfaceState`].
//! Input events and link events are routed through it; every intent it
//! produces becomes exactly one command on the sink.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use mcm_core::gesture::{DEFAULT_SENSITIVITY, DialSettings};
use mcm_core::page::DEFAULT_SWIPE_THRESHOLD;
use mcm_core::{ButtonKind, GroupDial, Intent, OutboundCommand, PageNavigator, VolumeDrag, encode};
use mcm_link::{LinkEvent, LinkHandle};

use crate::state::SurfaceState;

/// Where commands go.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink {
    /// Send a command. Returns `false` if it was dropped.
    fn send(&self, command: OutboundCommand) -> bool;
}

impl CommandSink for LinkHandle {
    fn send(&self, command: OutboundCommand) -> bool {
        LinkHandle::send(self, command)
    }
}

/// Vibration hint for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Haptic {
    /// Button, channel, or dial tap
    Press,
    /// Dial tick or page change
    Tick,
}

impl Haptic {
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Press => Duration::from_millis(10),
            Self::Tick => Duration::from_millis(5),
        }
    }
}

/// Raw input from the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    ButtonPress { button: ButtonKind },
    ChannelClick { channel: String },
    VolumePress { y: f32 },
    VolumeMove { y: f32 },
    VolumeRelease,
    DialPress { group: String, y: f32 },
    DialMove { y: f32 },
    DialRelease,
    DialClick { group: String },
    SwipeStart { x: f32 },
    SwipeEnd { x: f32 },
    PageSelect { page: usize },
}

/// Gesture tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    pub volume_sensitivity: f32,
    pub dial: DialSettings,
    pub swipe_threshold: f32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            volume_sensitivity: DEFAULT_SENSITIVITY,
            dial: DialSettings::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// One control surface bound to one command sink.
pub struct ControlSurface<S> {
    sink: S,
    state: SurfaceState,
    volume: VolumeDrag,
    dial: GroupDial,
    pages: PageNavigator,
}

impl<S: CommandSink> ControlSurface<S> {
    #[must_use]
    pub fn new(sink: S, state: SurfaceState, settings: SurfaceSettings) -> Self {
        state.set_page(0);
        Self {
            sink,
            state,
            volume: VolumeDrag::new(settings.volume_sensitivity),
            dial: GroupDial::new(settings.dial),
            pages: PageNavigator::new(settings.swipe_threshold),
        }
    }

    /// Observable state for rendering.
    #[must_use]
    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    /// Route one input event received at `now`.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Option<Haptic> {
        match event {
            InputEvent::ButtonPress { button } => {
                self.dispatch(Intent::Press(button));
                Some(Haptic::Press)
            }
            InputEvent::ChannelClick { channel } => {
                self.dispatch(Intent::ChannelClick(channel));
                Some(Haptic::Press)
            }
            InputEvent::VolumePress { y } => {
                self.volume.press(y, self.state.committed_volume());
                None
            }
            InputEvent::VolumeMove { y } => {
                if let Some(intent) = self.volume.moved(y) {
                    self.dispatch(intent);
                }
                None
            }
            InputEvent::VolumeRelease => {
                self.volume.release();
                None
            }
            InputEvent::DialPress { group, y } => {
                self.dial.press(&group, y);
                None
            }
            InputEvent::DialMove { y } => {
                let intent = self.dial.moved(y)?;
                self.dispatch(intent);
                Some(Haptic::Tick)
            }
            InputEvent::DialRelease => {
                self.dial.release(now);
                None
            }
            InputEvent::DialClick { group } => {
                let intent = self.dial.click(&group, now)?;
                self.dispatch(intent);
                Some(Haptic::Press)
            }
            InputEvent::SwipeStart { x } => {
                self.pages.swipe_start(x);
                None
            }
            InputEvent::SwipeEnd { x } => {
                let page = self.pages.swipe_end(x)?;
                self.state.set_page(page);
                Some(Haptic::Tick)
            }
            InputEvent::PageSelect { page } => {
                let page = self.pages.select(page)?;
                self.state.set_page(page);
                Some(Haptic::Tick)
            }
        }
    }

    /// Apply a notification from the link.
    pub fn apply_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::StateChanged(connection) => {
                info!(status = connection.status().label, "Connection state changed");
                self.state.set_connection(connection);
            }
            LinkEvent::RetryScheduled(delay) => {
                debug!(delay_ms = delay.as_millis(), "Reconnecting after delay");
            }
            LinkEvent::Snapshot(snapshot) => self.state.apply_snapshot(snapshot),
        }
    }

    /// Tear the surface down and hand back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn dispatch(&self, intent: Intent) {
        let command = encode(intent);
        let tag = command.tag();
        if self.sink.send(command) {
            debug!(command = tag, "Dispatched command");
        } else {
            trace!(command = tag, "Command dropped while disconnected");
        }
    }
}
