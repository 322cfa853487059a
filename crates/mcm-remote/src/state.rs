//! Observable surface state.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use mcm_core::{ConnectionState, ControlSnapshot, Projection, StatusView};

/// Thread-safe surface state.
///
/// Snapshot and projection are stored together, so a reader never sees a
/// projection from one snapshot next to values from another.
#[derive(Clone)]
pub struct SurfaceState {
    inner: Arc<ArcSwap<SurfaceStateInner>>,
}

#[derive(Clone, Default)]
struct SurfaceStateInner {
    /// Link lifecycle
    connection: ConnectionState,
    /// Latest valid snapshot and its projection
    current: Option<(Arc<ControlSnapshot>, Arc<Projection>)>,
    /// Visible page
    page: usize,
}

/// Everything a front end needs to render, as one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceView {
    pub connection: ConnectionState,
    pub status: StatusView,
    pub page: usize,
    pub projection: Option<Projection>,
    pub volume_label: Option<String>,
    pub knob_degrees: Option<f32>,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceState {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(ArcSwap::from_pointee(SurfaceStateInner::default())) }
    }

    /// Set the connection state.
    pub fn set_connection(&self, connection: ConnectionState) {
        let guard = self.inner.load();
        let mut state: SurfaceStateInner = (**guard).clone();
        state.connection = connection;
        self.inner.store(Arc::new(state));
    }

    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        self.inner.load().connection
    }

    /// Status line for the current connection state.
    #[must_use]
    pub fn status(&self) -> StatusView {
        self.connection().status()
    }

    /// Replace the current snapshot.
    pub fn apply_snapshot(&self, snapshot: ControlSnapshot) {
        let projection = Projection::from_snapshot(&snapshot);
        let guard = self.inner.load();
        let mut state: SurfaceStateInner = (**guard).clone();
        state.current = Some((Arc::new(snapshot), Arc::new(projection)));
        self.inner.store(Arc::new(state));
    }

    /// Master volume from the latest snapshot.
    #[must_use]
    pub fn committed_volume(&self) -> Option<f32> {
        self.inner.load().current.as_ref().map(|(snapshot, _)| snapshot.master_volume)
    }

    pub fn set_page(&self, page: usize) {
        let guard = self.inner.load();
        let mut state: SurfaceStateInner = (**guard).clone();
        state.page = page;
        self.inner.store(Arc::new(state));
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.inner.load().page
    }

    /// Consistent view of the whole state.
    #[must_use]
    pub fn view(&self) -> SurfaceView {
        let state = self.inner.load();
        let projection = state.current.as_ref().map(|(_, p)| (**p).clone());

        SurfaceView {
            connection: state.connection,
            status: state.connection.status(),
            page: state.page,
            volume_label: projection.as_ref().map(Projection::volume_label),
            knob_degrees: projection.as_ref().map(Projection::knob_degrees),
            projection,
        }
    }
}
