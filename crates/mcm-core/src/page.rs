//! Page navigation by swipe or indicator selection.

use tracing::debug;

/// Number of pages on the surface.
pub const PAGE_COUNT: usize = 3;

/// Horizontal travel needed for a swipe to change page.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Bounded page index driven by swipes and explicit selection.
#[derive(Debug, Clone)]
pub struct PageNavigator {
    current: usize,
    swipe_threshold: f32,
    touch_start_x: Option<f32>,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl PageNavigator {
    #[must_use]
    pub fn new(swipe_threshold: f32) -> Self {
        Self { current: 0, swipe_threshold, touch_start_x: None }
    }

    /// The current page index.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// A touch began at horizontal position `x`.
    pub fn swipe_start(&mut self, x: f32) {
        self.touch_start_x = Some(x);
    }

    /// A touch ended at `x`. Returns the new page if the swipe moved it.
    ///
    /// Swiping left (start right of end) advances; there is no wraparound.
    pub fn swipe_end(&mut self, x: f32) -> Option<usize> {
        let start = self.touch_start_x.take()?;
        let diff = start - x;

        if diff.abs() <= self.swipe_threshold {
            return None;
        }

        let target = if diff > 0.0 {
            (self.current + 1 < PAGE_COUNT).then_some(self.current + 1)
        } else {
            self.current.checked_sub(1)
        }?;

        debug!(from = self.current, to = target, "Page swipe");
        self.current = target;
        Some(target)
    }

    /// Jump straight to `page`. Out-of-range requests are ignored.
    pub fn select(&mut self, page: usize) -> Option<usize> {
        if page >= PAGE_COUNT {
            debug!(page, "Ignoring out-of-range page selection");
            return None;
        }
        self.current = page;
        Some(page)
    }
}
