//! Rendering collaborator seams.
//!
//! The pipeline does not draw anything itself. It projects readings onto two
//! kinds of surfaces: keyed text targets for instantaneous values, and chart
//! widgets treated as black boxes exposing bulk-replace and append
//! operations. Terminal frontends, GUI widgets, and the test mocks all
//! implement these traits.

use roomtel_types::{Field, SeriesPoint};

/// A charting widget for one series.
///
/// Mirrors the classic chart-widget surface: `set_data` replaces the whole
/// series, `add_point` appends one point, with `shift` dropping the oldest
/// displayed point so the window stays bounded.
pub trait ChartSurface {
    /// Replace the whole series.
    fn set_data(&mut self, points: &[SeriesPoint], redraw: bool);

    /// Append one point. `shift` is true exactly when the backing buffer
    /// evicted; the widget should drop its oldest point in the same
    /// operation.
    fn add_point(&mut self, point: SeriesPoint, redraw: bool, shift: bool, animate: bool);
}

/// A keyed set of text display targets.
///
/// Targets are addressed by `(entity index, field)`. A target that is never
/// written keeps whatever it showed before.
pub trait DisplayTarget {
    fn set_text(&mut self, entity: usize, field: Field, text: &str);
}
