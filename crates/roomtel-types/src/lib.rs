//! Platform-agnostic types for roomtel environmental sensor nodes.
//!
//! This crate holds the data model and the payload text grammar shared by
//! every roomtel frontend: field schemas, decoded readings, chart points,
//! and the cycle payload with its demultiplexer.
//!
//! # Grammar overview
//!
//! The sensor nodes answer plain HTTP GETs with compact delimited text in
//! one of three shapes:
//!
//! | Kind     | Shape                                                        |
//! |----------|--------------------------------------------------------------|
//! | flat     | one line, space-separated scalars, single entity             |
//! | snapshot | one line per entity, `;`-separated scalars                   |
//! | history  | `,`-separated sample tuples, `;`- or newline-framed          |
//!
//! Decoding is total: unparseable fields become the explicit missing marker
//! (`f64::NAN`) instead of failing the cycle or silently reading as zero.
//!
//! # Example
//!
//! ```
//! use roomtel_types::{Payload, PayloadKind, schema};
//!
//! let payload = Payload::decode(
//!     "1700000000 21.5 40.2 21.8 39.9 1013.2",
//!     PayloadKind::Flat(&schema::FLAT_BME280),
//! );
//! let current = payload.latest();
//! assert_eq!(current[0].as_ref().unwrap().temperature, 21.8);
//! ```

pub mod error;
pub mod payload;
pub mod reading;
pub mod schema;

pub use error::{ParseError, ParseResult};
pub use payload::{HistoryFraming, Payload, PayloadKind};
pub use reading::{Reading, SeriesPoint, parse_number};
pub use schema::{Field, FieldSchema, FieldSpec};
