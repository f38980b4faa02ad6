//! Time-series chart rendering.

use roomtel_types::{Field, Payload, Reading, SeriesPoint};

use crate::buffer::RollingBuffer;
use crate::surface::ChartSurface;

/// One chart series: a field, its rolling buffer, and its chart widget.
///
/// The buffer is owned exclusively by this series; no sharing across chart
/// widgets, so no cross-component locking is ever needed.
pub struct MetricSeries<C: ChartSurface> {
    field: Field,
    buffer: RollingBuffer,
    chart: C,
}

impl<C: ChartSurface> MetricSeries<C> {
    pub fn new(field: Field, buffer: RollingBuffer, chart: C) -> Self {
        Self {
            field,
            buffer,
            chart,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }
}

/// Projects one entity's readings onto a set of chart series.
///
/// Initial load replaces each series wholesale so a freshly opened dashboard
/// shows full recent history immediately; steady-state ticks append one
/// point per series and apply the eviction policy, keeping chart width
/// bounded no matter how long the dashboard stays up.
///
/// Points are applied in call order. Overlapping fetches may complete out of
/// issue order; the series neither reorders nor deduplicates (see
/// [`RollingBuffer`] for the non-resequencing contract).
pub struct SeriesRenderer<C: ChartSurface> {
    entity: usize,
    series: Vec<MetricSeries<C>>,
    loaded: bool,
}

impl<C: ChartSurface> SeriesRenderer<C> {
    /// Create a renderer for one entity's charts.
    pub fn new(entity: usize, series: Vec<MetricSeries<C>>) -> Self {
        Self {
            entity,
            series,
            loaded: false,
        }
    }

    /// Entity index this renderer tracks.
    pub fn entity(&self) -> usize {
        self.entity
    }

    /// Whether the initial history load has happened.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace every series from a full history payload.
    pub fn on_initial_load(&mut self, payload: &Payload) {
        let samples = payload.history(self.entity);
        for series in &mut self.series {
            let points: Vec<SeriesPoint> = samples
                .iter()
                .map(|sample| sample.series_point(series.field, 0))
                .collect();
            series.buffer.replace_all(points);
            series.chart.set_data(&series.buffer.to_vec(), true);
        }
        self.loaded = true;
    }

    /// Append one cycle's reading to every series.
    ///
    /// `received_at_ms` stamps points from feeds whose grammar carries no
    /// timestamp (the scalar endpoints chart against receipt time). Missing
    /// values are appended as-is; the chart widget inherits the decoder's
    /// transparency contract.
    pub fn on_tick(&mut self, reading: &Reading, received_at_ms: i64) {
        for series in &mut self.series {
            let point = reading.series_point(series.field, received_at_ms);
            let shift = series.buffer.append(point);
            series.chart.add_point(point, true, shift, true);
        }
        self.loaded = true;
    }

    /// Apply a decoded cycle: the first history payload is an initial load,
    /// everything afterwards appends the entity's current sample.
    pub fn apply(&mut self, payload: &Payload, received_at_ms: i64) {
        if !self.loaded && matches!(payload, Payload::History(_)) {
            self.on_initial_load(payload);
            return;
        }
        if let Some(reading) = payload.latest().into_iter().nth(self.entity).flatten() {
            self.on_tick(&reading, received_at_ms);
        }
    }

    /// The underlying series, for inspection.
    pub fn series(&self) -> &[MetricSeries<C>] {
        &self.series
    }
}
