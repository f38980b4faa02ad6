//! Terminal rendering surfaces.
//!
//! [`TermDisplay`] and [`TermChart`] are the terminal-side implementations
//! of the core rendering traits: the display collects per-room cells into
//! aligned lines, and the chart keeps the visible point window and draws it
//! as a unicode sparkline.

use std::collections::HashMap;
use std::fmt::Write as _;

use owo_colors::OwoColorize;

use roomtel_core::{ChartSurface, DisplayTarget};
use roomtel_types::{Field, SeriesPoint};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Display target that renders each room as one aligned line.
#[derive(Debug)]
pub struct TermDisplay {
    cells: HashMap<(usize, Field), String>,
    rooms: Vec<String>,
    no_color: bool,
}

impl TermDisplay {
    pub fn new(rooms: Vec<String>, no_color: bool) -> Self {
        Self {
            cells: HashMap::new(),
            rooms,
            no_color,
        }
    }

    fn label(&self, entity: usize) -> String {
        self.cells
            .get(&(entity, Field::EntityId))
            .cloned()
            .or_else(|| self.rooms.get(entity).cloned())
            .unwrap_or_else(|| format!("room {entity}"))
    }

    fn cell(&self, entity: usize, field: Field) -> &str {
        self.cells
            .get(&(entity, field))
            .map_or("-", String::as_str)
    }

    /// Render one line per room seen so far, in entity order.
    pub fn render(&self, fields: &[Field]) -> String {
        let entities = self
            .cells
            .keys()
            .map(|(entity, _)| *entity)
            .max()
            .map_or(0, |max| max + 1);

        let mut out = String::new();
        for entity in 0..entities {
            let label = self.label(entity);
            if self.no_color {
                let _ = write!(out, "{label:<14}");
            } else {
                let _ = write!(out, "{:<14}", label.cyan());
            }
            for &field in fields {
                match field {
                    Field::EntityId => {}
                    Field::Timestamp => {
                        let clock = self.cell(entity, field);
                        if self.no_color {
                            let _ = write!(out, "  [{clock}]");
                        } else {
                            let _ = write!(out, "  [{}]", clock.dimmed());
                        }
                    }
                    _ => {
                        let value = self.cell(entity, field);
                        if self.no_color {
                            let _ = write!(out, "  {value} {}", field.unit());
                        } else {
                            let _ = write!(out, "  {} {}", value.green(), field.unit());
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

impl DisplayTarget for TermDisplay {
    fn set_text(&mut self, entity: usize, field: Field, text: &str) {
        self.cells.insert((entity, field), text.to_string());
    }
}

/// Chart surface that keeps the visible window and draws a sparkline.
#[derive(Debug)]
pub struct TermChart {
    label: String,
    points: Vec<SeriesPoint>,
    no_color: bool,
}

impl TermChart {
    pub fn new(label: impl Into<String>, no_color: bool) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
            no_color,
        }
    }

    /// One-line sparkline of the current window, with min/last/max legend.
    pub fn render(&self) -> String {
        let finite: Vec<f64> = self
            .points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .collect();
        if finite.is_empty() {
            return format!("{:<14}  (no data)", self.label);
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let mut bars = String::with_capacity(self.points.len() * 3);
        for point in &self.points {
            if !point.value.is_finite() {
                bars.push(' ');
                continue;
            }
            let level = if span == 0.0 {
                0
            } else {
                (((point.value - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            };
            bars.push(SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]);
        }

        let last = finite.last().copied().unwrap_or(f64::NAN);
        if self.no_color {
            format!("{:<14}{bars}  {min} / {last} / {max}", self.label)
        } else {
            format!(
                "{:<14}{}  {} / {} / {}",
                self.label.cyan(),
                bars.green(),
                min.dimmed(),
                last,
                max.dimmed()
            )
        }
    }
}

impl ChartSurface for TermChart {
    fn set_data(&mut self, points: &[SeriesPoint], _redraw: bool) {
        self.points = points.to_vec();
    }

    fn add_point(&mut self, point: SeriesPoint, _redraw: bool, shift: bool, _animate: bool) {
        if shift && !self.points.is_empty() {
            self.points.remove(0);
        }
        self.points.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_rooms_in_entity_order() {
        let mut display = TermDisplay::new(vec!["living_room".into(), "bedroom".into()], true);
        display.set_text(1, Field::Temperature, "19.1");
        display.set_text(0, Field::Temperature, "21.8");

        let out = display.render(&[Field::Temperature]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("living_room"));
        assert!(lines[0].contains("21.8 °C"));
        assert!(lines[1].contains("19.1 °C"));
    }

    #[test]
    fn display_prefers_reported_entity_id_over_configured_label() {
        let mut display = TermDisplay::new(vec!["living_room".into()], true);
        display.set_text(0, Field::EntityId, "attic_node");
        display.set_text(0, Field::Humidity, "40");

        let out = display.render(&[Field::Humidity]);
        assert!(out.starts_with("attic_node"));
    }

    #[test]
    fn sparkline_follows_shift_semantics() {
        let mut chart = TermChart::new("temperature", true);
        chart.set_data(
            &[SeriesPoint::new(0, 20.0), SeriesPoint::new(1000, 21.0)],
            true,
        );
        chart.add_point(SeriesPoint::new(2000, 22.0), true, true, true);

        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].value, 21.0);
        let out = chart.render();
        assert!(out.contains("21 / 22 / 22"));
    }

    #[test]
    fn sparkline_skips_missing_values() {
        let mut chart = TermChart::new("humidity", true);
        chart.set_data(
            &[
                SeriesPoint::new(0, 40.0),
                SeriesPoint::new(1000, f64::NAN),
                SeriesPoint::new(2000, 44.0),
            ],
            true,
        );
        let out = chart.render();
        // the missing sample leaves a gap rather than collapsing the line
        assert!(out.contains(' '));
        assert!(out.contains("40 / 44 / 44"));
    }
}
