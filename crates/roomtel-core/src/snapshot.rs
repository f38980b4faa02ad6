//! Instantaneous value rendering.

use time::{OffsetDateTime, UtcOffset};

use roomtel_types::{Field, Reading};

use crate::surface::DisplayTarget;

/// Format a unix-seconds timestamp as zero-padded 24-hour wall clock time,
/// `"HH : MM : SS"`, in the given offset.
pub fn format_clock(unix_seconds: i64, offset: UtcOffset) -> String {
    match OffsetDateTime::from_unix_timestamp(unix_seconds) {
        Ok(moment) => {
            let local = moment.to_offset(offset);
            format!(
                "{:02} : {:02} : {:02}",
                local.hour(),
                local.minute(),
                local.second()
            )
        }
        Err(_) => "NaN".to_string(),
    }
}

/// Projects current readings onto a keyed text display.
///
/// One renderer serves one display group layout: it writes every configured
/// field of a reading to the target keyed by `(entity index, field)`.
/// Missing values render as the literal token `NaN`, passed through from the
/// decoder unchanged.
///
/// An entity with no reading this cycle is skipped entirely, leaving its
/// targets in their prior state.
pub struct SnapshotRenderer<D: DisplayTarget> {
    target: D,
    fields: Vec<Field>,
    offset: UtcOffset,
}

impl<D: DisplayTarget> SnapshotRenderer<D> {
    /// Create a renderer writing the given fields, using local wall-clock
    /// time for timestamps (falling back to UTC when the local offset is
    /// unavailable).
    pub fn new(target: D, fields: Vec<Field>) -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self::with_offset(target, fields, offset)
    }

    /// Create a renderer with an explicit UTC offset for timestamp display.
    pub fn with_offset(target: D, fields: Vec<Field>, offset: UtcOffset) -> Self {
        Self {
            target,
            fields,
            offset,
        }
    }

    /// Render one entity's reading onto its display targets.
    pub fn render(&mut self, entity: usize, reading: &Reading) {
        for &field in &self.fields {
            let text = match field {
                Field::EntityId => match &reading.entity_id {
                    Some(id) => id.clone(),
                    None => continue,
                },
                Field::Timestamp => match reading.timestamp {
                    Some(secs) => format_clock(secs, self.offset),
                    None => "NaN".to_string(),
                },
                _ => reading.number(field).to_string(),
            };
            self.target.set_text(entity, field, &text);
        }
    }

    /// Render a demultiplexed cycle: entities absent this cycle are skipped,
    /// so their targets keep the previous values.
    pub fn render_all(&mut self, latest: &[Option<Reading>]) {
        for (entity, reading) in latest.iter().enumerate() {
            if let Some(reading) = reading {
                self.render(entity, reading);
            }
        }
    }

    /// Fields this renderer writes.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Access the underlying display target.
    pub fn target(&self) -> &D {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDisplay;
    use roomtel_types::{Payload, PayloadKind, schema};

    fn renderer(fields: Vec<Field>) -> SnapshotRenderer<MockDisplay> {
        SnapshotRenderer::with_offset(MockDisplay::new(), fields, UtcOffset::UTC)
    }

    #[test]
    fn clock_is_zero_padded() {
        // 1700000000 = 2023-11-14 22:13:20 UTC
        assert_eq!(format_clock(1_700_000_000, UtcOffset::UTC), "22 : 13 : 20");
        // 1699999445 = 2023-11-14 22:04:05 UTC
        assert_eq!(format_clock(1_699_999_445, UtcOffset::UTC), "22 : 04 : 05");
    }

    #[test]
    fn clock_honors_offset() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        assert_eq!(format_clock(1_700_000_000, offset), "00 : 13 : 20");
    }

    #[test]
    fn renders_flat_reading() {
        let payload = Payload::decode(
            "1700000000 21.5 40.2 21.8 39.9 1013.2",
            PayloadKind::Flat(&schema::FLAT_BME280),
        );
        let mut snapshot = renderer(vec![
            Field::Timestamp,
            Field::TemperatureDht,
            Field::HumidityDht,
            Field::Temperature,
            Field::Humidity,
            Field::Pressure,
        ]);
        snapshot.render_all(&payload.latest());

        let display = snapshot.target();
        assert_eq!(display.get(0, Field::Timestamp), Some("22 : 13 : 20"));
        assert_eq!(display.get(0, Field::TemperatureDht), Some("21.5"));
        assert_eq!(display.get(0, Field::Humidity), Some("39.9"));
        assert_eq!(display.get(0, Field::Pressure), Some("1013.2"));
    }

    #[test]
    fn missing_value_renders_nan_literal() {
        let payload = Payload::decode(
            "1700000000 21.5 40.2 21.8  ",
            PayloadKind::Flat(&schema::FLAT_BME280),
        );
        let mut snapshot = renderer(vec![Field::Humidity, Field::Pressure]);
        snapshot.render_all(&payload.latest());

        let display = snapshot.target();
        assert_eq!(display.get(0, Field::Humidity), Some("NaN"));
        assert_eq!(display.get(0, Field::Pressure), Some("NaN"));
    }

    #[test]
    fn absent_entity_keeps_prior_state() {
        let fields = vec![Field::EntityId, Field::Temperature];
        let mut snapshot = renderer(fields);

        let first = Payload::decode(
            "living_room;1700000000;21.8;39.9;1013.2;102.4\n\
             bedroom;1700000000;19.1;45.0;1013.0;98.0",
            PayloadKind::Snapshot(&schema::SNAPSHOT),
        );
        snapshot.render_all(&first.latest());
        assert_eq!(snapshot.target().get(1, Field::Temperature), Some("19.1"));

        // bedroom's line is empty this cycle; its targets must not change
        let second = Payload::decode(
            "living_room;1700000060;22.0;39.5;1013.1;102.4\n ",
            PayloadKind::Snapshot(&schema::SNAPSHOT),
        );
        snapshot.render_all(&second.latest());

        let display = snapshot.target();
        assert_eq!(display.get(0, Field::Temperature), Some("22"));
        assert_eq!(display.get(1, Field::Temperature), Some("19.1"));
        assert_eq!(display.get(1, Field::EntityId), Some("bedroom"));
    }

    #[test]
    fn history_payload_renders_newest_sample() {
        // current value of a history chunk is the last tuple, not the head
        let payload = Payload::decode(
            "23,1700000000,21.5,40.2,1013.2,100\n23,1700000100,21.9,40.0,1013.0,100",
            PayloadKind::History {
                schema: &schema::HISTORY_TUPLE,
                framing: roomtel_types::HistoryFraming::SampleLines,
            },
        );
        let mut snapshot = renderer(vec![Field::Temperature, Field::Humidity]);
        snapshot.render_all(&payload.latest());

        let display = snapshot.target();
        assert_eq!(display.get(0, Field::Temperature), Some("21.9"));
        assert_eq!(display.get(0, Field::Humidity), Some("40"));
    }
}
