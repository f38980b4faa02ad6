//! Bounded rolling buffer backing one chart series.

use std::collections::VecDeque;

use roomtel_types::SeriesPoint;

/// Default retained length: charts start shifting once a series holds more
/// than 40 points.
pub const DEFAULT_WINDOW: usize = 41;

/// A bounded, time-ordered point buffer for one (entity, field) series.
///
/// Owned exclusively by the series renderer for that chart; never shared
/// across widgets. Created empty, mutated only by appends and full
/// replacements, never persisted.
///
/// The buffer never reorders: if the upstream decoder yields an out-of-order
/// point it is appended as-is.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    points: VecDeque<SeriesPoint>,
    window: usize,
}

impl RollingBuffer {
    /// Create an empty buffer with the default window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create an empty buffer retaining at most `window` points.
    ///
    /// A zero window is clamped to 1; an empty series cannot accept appends
    /// otherwise.
    pub fn with_window(window: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(window.max(1)),
            window: window.max(1),
        }
    }

    /// Append a point, evicting oldest points first so the buffer never
    /// exceeds the window after any append.
    ///
    /// Returns `true` when at least one point was evicted, which is exactly the
    /// `shift` flag the chart collaborator expects on `add_point`. Eviction
    /// also governs appends that follow a [`replace_all`](Self::replace_all)
    /// which installed more than a window's worth of points: the buffer is
    /// trimmed back down to the window in that single append.
    pub fn append(&mut self, point: SeriesPoint) -> bool {
        let mut evicted = false;
        while self.points.len() >= self.window {
            self.points.pop_front();
            evicted = true;
        }
        self.points.push_back(point);
        evicted
    }

    /// Replace the whole series, accepting the provided sequence verbatim.
    ///
    /// Used only at initial load / full resync; the visualization layer, not
    /// this buffer, decides whether to display only the tail of an oversized
    /// history.
    pub fn replace_all(&mut self, points: Vec<SeriesPoint>) {
        self.points = points.into();
    }

    /// Points in order, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    /// Snapshot of the series as a contiguous vector.
    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().copied().collect()
    }

    /// Newest point, if any.
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum retained length.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::new()
    }
}
