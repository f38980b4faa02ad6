//! Payload decoding and record demultiplexing.
//!
//! A payload is the raw response body for one ingestion cycle. Decoding
//! splits on line boundaries first, then on `;` per entity, then on the
//! schema's scalar separator. It never fails: field-level problems become
//! the missing marker, and a structurally empty entity chunk drops only that
//! entity for the cycle.
//!
//! Entities are identified strictly by position (line index); the id string
//! embedded in a record is metadata only.

use crate::reading::Reading;
use crate::schema::FieldSchema;

/// How history sample chunks are framed within the response body.
///
/// The delimiter between historical samples is a property of the feed, not
/// of the data, so it is declared once per endpoint rather than guessed from
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFraming {
    /// One line per entity; `;` separates that entity's samples.
    EntityLines,
    /// Single entity; one sample per line (`;` within a line is tolerated as
    /// an additional sample separator).
    SampleLines,
}

/// Payload grammar tag, resolved once at feed configuration time.
#[derive(Debug, Clone, Copy)]
pub enum PayloadKind {
    /// Single-entity record in one line, space-separated.
    Flat(&'static FieldSchema),
    /// One entity record per line, `;`-separated fields.
    Snapshot(&'static FieldSchema),
    /// Historical sample tuples, `,`-separated fields.
    History {
        schema: &'static FieldSchema,
        framing: HistoryFraming,
    },
}

/// The decoded response for one ingestion cycle.
///
/// The outer index is the entity index, and the position → identity mapping
/// is stable across cycles (line 0 is always room 0). Entity count may vary
/// when sensor modules drop out.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Single-entity snapshot; `None` when the body was empty.
    Flat(Option<Reading>),
    /// Per-entity current readings; `None` for entities whose line was
    /// empty or absent this cycle.
    Snapshot(Vec<Option<Reading>>),
    /// Per-entity time-ordered sample lists.
    History(Vec<Vec<Reading>>),
}

/// Parse one record chunk against a schema.
///
/// Returns `None` for a structurally empty chunk. Fields beyond the chunk's
/// scalar count stay at the missing marker; surplus scalars are ignored.
fn parse_record(schema: &FieldSchema, chunk: &str) -> Option<Reading> {
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return None;
    }

    let mut reading = Reading::default();
    if schema.separator() == ' ' {
        for (spec, raw) in schema.fields().iter().zip(chunk.split_whitespace()) {
            reading.set(spec.field, raw);
        }
    } else {
        for (spec, raw) in schema.fields().iter().zip(chunk.split(schema.separator())) {
            reading.set(spec.field, raw);
        }
    }
    Some(reading)
}

impl Payload {
    /// Decode a raw response body.
    ///
    /// Decoding is total: malformed fields become missing markers and
    /// malformed entities become absences, so partial data still renders.
    pub fn decode(raw: &str, kind: PayloadKind) -> Payload {
        match kind {
            PayloadKind::Flat(schema) => Payload::Flat(parse_record(schema, raw)),
            PayloadKind::Snapshot(schema) => Payload::Snapshot(
                raw.lines().map(|line| parse_record(schema, line)).collect(),
            ),
            PayloadKind::History { schema, framing } => {
                let entities: Vec<Vec<Reading>> = match framing {
                    HistoryFraming::EntityLines => raw
                        .lines()
                        .map(|line| {
                            line.split(';')
                                .filter_map(|chunk| parse_record(schema, chunk))
                                .collect()
                        })
                        .collect(),
                    HistoryFraming::SampleLines => {
                        let samples: Vec<Reading> = raw
                            .lines()
                            .flat_map(|line| line.split(';'))
                            .filter_map(|chunk| parse_record(schema, chunk))
                            .collect();
                        vec![samples]
                    }
                };
                Payload::History(entities)
            }
        }
    }

    /// Number of entity slots this payload covers.
    pub fn entity_count(&self) -> usize {
        match self {
            Payload::Flat(_) => 1,
            Payload::Snapshot(readings) => readings.len(),
            Payload::History(entities) => entities.len(),
        }
    }

    /// Demultiplex: entity index → current reading.
    ///
    /// Strictly positional. For history payloads the current reading is the
    /// **last** (newest) sample of the entity's chunk list, not the head. An absent entity maps to `None`; consumers decide whether to
    /// blank its display or leave the prior state.
    pub fn latest(&self) -> Vec<Option<Reading>> {
        match self {
            Payload::Flat(reading) => vec![reading.clone()],
            Payload::Snapshot(readings) => readings.clone(),
            Payload::History(entities) => entities
                .iter()
                .map(|samples| samples.last().cloned())
                .collect(),
        }
    }

    /// Full sample history for one entity; empty for non-history payloads
    /// without stored samples beyond the current one.
    pub fn history(&self, entity: usize) -> &[Reading] {
        match self {
            Payload::History(entities) => entities.get(entity).map_or(&[], Vec::as_slice),
            _ => &[],
        }
    }
}
