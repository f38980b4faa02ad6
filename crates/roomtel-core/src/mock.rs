//! Mock surfaces and feed for testing and the demo mode.
//!
//! [`MockDisplay`] and [`MockChart`] implement the rendering collaborator
//! traits and record every call, so tests can assert exactly what the
//! pipeline projected. [`MockFeed`] generates payload bodies in the real
//! server grammars with gently drifting values, for exercising the whole
//! pipeline without a sensor node on the network.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use roomtel_types::{Field, SeriesPoint};

use crate::surface::{ChartSurface, DisplayTarget};

/// A display target that stores the last text written per key.
#[derive(Debug, Default)]
pub struct MockDisplay {
    cells: HashMap<(usize, Field), String>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written to `(entity, field)`, if any.
    pub fn get(&self, entity: usize, field: Field) -> Option<&str> {
        self.cells.get(&(entity, field)).map(String::as_str)
    }

    /// Number of targets that have been written at least once.
    pub fn written(&self) -> usize {
        self.cells.len()
    }
}

impl DisplayTarget for MockDisplay {
    fn set_text(&mut self, entity: usize, field: Field, text: &str) {
        self.cells.insert((entity, field), text.to_string());
    }
}

/// One recorded chart-surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartCall {
    SetData {
        points: Vec<SeriesPoint>,
        redraw: bool,
    },
    AddPoint {
        point: SeriesPoint,
        redraw: bool,
        shift: bool,
        animate: bool,
    },
}

/// A chart surface that records every call.
#[derive(Debug, Default)]
pub struct MockChart {
    calls: Vec<ChartCall>,
}

impl MockChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[ChartCall] {
        &self.calls
    }
}

impl ChartSurface for MockChart {
    fn set_data(&mut self, points: &[SeriesPoint], redraw: bool) {
        self.calls.push(ChartCall::SetData {
            points: points.to_vec(),
            redraw,
        });
    }

    fn add_point(&mut self, point: SeriesPoint, redraw: bool, shift: bool, animate: bool) {
        self.calls.push(ChartCall::AddPoint {
            point,
            redraw,
            shift,
            animate,
        });
    }
}

/// How many historical samples the mock feed retains per room.
const MOCK_HISTORY_LEN: usize = 41;

#[derive(Debug, Clone)]
struct RoomSim {
    name: String,
    temperature: f64,
    humidity: f64,
    pressure: f64,
    altitude: f64,
    gas_resistance: Option<f64>,
    history: VecDeque<(i64, f64, f64, f64, f64)>,
}

/// Generates payload bodies in the real server grammars.
///
/// Values drift by a small random walk per step, like a room does. The
/// first room simulates a BME680 node (with gas resistance); the rest are
/// BME280-class nodes.
#[derive(Debug)]
pub struct MockFeed {
    rooms: Vec<RoomSim>,
    clock: i64,
    rng: StdRng,
}

impl MockFeed {
    /// Create a feed for the named rooms, starting at the given unix time.
    pub fn new(room_names: &[&str], start_unix: i64) -> Self {
        Self::with_seed(room_names, start_unix, rand::random())
    }

    /// Create a feed with a fixed RNG seed, for deterministic tests.
    pub fn with_seed(room_names: &[&str], start_unix: i64, seed: u64) -> Self {
        let rooms = room_names
            .iter()
            .enumerate()
            .map(|(i, name)| RoomSim {
                name: (*name).to_string(),
                temperature: 21.0 + i as f64 * 0.7,
                humidity: 42.0 + i as f64 * 2.0,
                pressure: 1013.2,
                altitude: 102.4,
                gas_resistance: (i == 0).then_some(52_000.0),
                history: VecDeque::with_capacity(MOCK_HISTORY_LEN),
            })
            .collect();
        Self {
            rooms,
            clock: start_unix,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance the simulation by `period_secs` and record a sample per room.
    pub fn step(&mut self, period_secs: i64) {
        self.clock += period_secs;
        for room in &mut self.rooms {
            room.temperature += self.rng.random_range(-0.15..0.15);
            room.humidity = (room.humidity + self.rng.random_range(-0.5..0.5)).clamp(0.0, 100.0);
            room.pressure += self.rng.random_range(-0.1..0.1);
            if let Some(gas) = room.gas_resistance.as_mut() {
                *gas += self.rng.random_range(-200.0..200.0);
            }

            if room.history.len() >= MOCK_HISTORY_LEN {
                room.history.pop_front();
            }
            room.history.push_back((
                self.clock,
                room.temperature,
                room.humidity,
                room.pressure,
                room.altitude,
            ));
        }
    }

    /// Current simulated unix time.
    pub fn clock(&self) -> i64 {
        self.clock
    }

    /// `/data` body: one `;`-separated snapshot line per room.
    pub fn snapshot_body(&self) -> String {
        let mut body = String::new();
        for (i, room) in self.rooms.iter().enumerate() {
            if i > 0 {
                body.push('\n');
            }
            let _ = write!(
                body,
                "{};{};{:.1};{:.1};{:.1};{:.1}",
                room.name, self.clock, room.temperature, room.humidity, room.pressure,
                room.altitude
            );
            if let Some(gas) = room.gas_resistance {
                let _ = write!(body, ";{gas:.0}");
            }
        }
        body
    }

    /// `/all_data` body: one line per room, `;`-separated `,`-tuples.
    pub fn history_body(&self) -> String {
        let mut body = String::new();
        for (i, room) in self.rooms.iter().enumerate() {
            if i > 0 {
                body.push('\n');
            }
            for (j, (ts, temp, hum, pressure, altitude)) in room.history.iter().enumerate() {
                if j > 0 {
                    body.push(';');
                }
                let _ = write!(
                    body,
                    "{},{},{temp:.1},{hum:.1},{pressure:.1},{altitude:.1}",
                    room.name, ts
                );
            }
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomtel_types::{HistoryFraming, Payload, PayloadKind, schema};

    #[test]
    fn snapshot_body_decodes() {
        let mut feed = MockFeed::with_seed(&["living_room", "bedroom"], 1_700_000_000, 7);
        feed.step(60);

        let payload = Payload::decode(
            &feed.snapshot_body(),
            PayloadKind::Snapshot(&schema::SNAPSHOT),
        );
        assert_eq!(payload.entity_count(), 2);

        let latest = payload.latest();
        let room0 = latest[0].as_ref().unwrap();
        assert_eq!(room0.entity_id.as_deref(), Some("living_room"));
        assert_eq!(room0.timestamp, Some(1_700_000_060));
        assert!(room0.has(Field::GasResistance));

        let room1 = latest[1].as_ref().unwrap();
        assert!(!room1.has(Field::GasResistance));
    }

    #[test]
    fn history_body_decodes_in_time_order() {
        let mut feed = MockFeed::with_seed(&["living_room"], 1_700_000_000, 7);
        for _ in 0..3 {
            feed.step(60);
        }

        let payload = Payload::decode(
            &feed.history_body(),
            PayloadKind::History {
                schema: &schema::HISTORY_TUPLE,
                framing: HistoryFraming::EntityLines,
            },
        );
        let samples = payload.history(0);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].timestamp, Some(1_700_000_060));
        assert_eq!(samples[2].timestamp, Some(1_700_000_180));
    }

    #[test]
    fn history_is_bounded() {
        let mut feed = MockFeed::with_seed(&["living_room"], 1_700_000_000, 7);
        for _ in 0..100 {
            feed.step(60);
        }

        let payload = Payload::decode(
            &feed.history_body(),
            PayloadKind::History {
                schema: &schema::HISTORY_TUPLE,
                framing: HistoryFraming::EntityLines,
            },
        );
        assert_eq!(payload.history(0).len(), MOCK_HISTORY_LEN);
    }

    #[test]
    fn mock_display_records_writes() {
        let mut display = MockDisplay::new();
        display.set_text(0, Field::Temperature, "21.5");
        display.set_text(0, Field::Temperature, "21.6");

        assert_eq!(display.get(0, Field::Temperature), Some("21.6"));
        assert_eq!(display.written(), 1);
        assert!(display.get(1, Field::Temperature).is_none());
    }
}
