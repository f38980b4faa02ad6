//! Declarative payload field schemas.
//!
//! The server nodes all speak the same compact delimited text format, but the
//! field order and separator vary by endpoint. Instead of one ad hoc parser
//! per feed, each grammar is declared once as a [`FieldSchema`]: an ordered
//! list of fields plus the scalar separator. The decoder in
//! [`crate::payload`] is parametrized by a schema and never hardcodes field
//! positions.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One addressable position in a payload record.
///
/// Doubles as the display-target key: a snapshot view writes each field of an
/// entity to the target identified by `(entity_index, Field)`, and a chart
/// tracks exactly one numeric `Field` per series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum Field {
    /// Node identifier string (metadata only; entities are matched by
    /// position, never by this value).
    EntityId,
    /// Sample time in unix seconds.
    Timestamp,
    /// Temperature from the auxiliary DHT11 sensor, in °C.
    TemperatureDht,
    /// Relative humidity from the auxiliary DHT11 sensor, in %.
    HumidityDht,
    /// Temperature from the environmental (BME) sensor, in °C.
    Temperature,
    /// Relative humidity from the environmental sensor, in %.
    Humidity,
    /// Atmospheric pressure in hPa.
    Pressure,
    /// Estimated altitude in m.
    Altitude,
    /// Gas resistance in Ω (BME680 only).
    GasResistance,
}

impl Field {
    /// Stable string key for this field, used in display-target addressing
    /// and configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Field::EntityId => "entity_id",
            Field::Timestamp => "time",
            Field::TemperatureDht => "temperature_dht11",
            Field::HumidityDht => "humidity_dht11",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Pressure => "pressure",
            Field::Altitude => "altitude",
            Field::GasResistance => "gas_resistance",
        }
    }

    /// Resolve a field from its string key.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownField`] if the key does not name a field.
    pub fn from_key(key: &str) -> Result<Self, ParseError> {
        match key {
            "entity_id" => Ok(Field::EntityId),
            "time" => Ok(Field::Timestamp),
            "temperature_dht11" => Ok(Field::TemperatureDht),
            "humidity_dht11" => Ok(Field::HumidityDht),
            "temperature" => Ok(Field::Temperature),
            "humidity" => Ok(Field::Humidity),
            "pressure" => Ok(Field::Pressure),
            "altitude" => Ok(Field::Altitude),
            "gas_resistance" => Ok(Field::GasResistance),
            _ => Err(ParseError::UnknownField(key.to_string())),
        }
    }

    /// Whether this field carries a numeric sensor value (as opposed to the
    /// entity id or timestamp).
    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::EntityId | Field::Timestamp)
    }

    /// Measurement unit suffix for display purposes.
    pub fn unit(self) -> &'static str {
        match self {
            Field::EntityId | Field::Timestamp => "",
            Field::TemperatureDht | Field::Temperature => "°C",
            Field::HumidityDht | Field::Humidity => "%",
            Field::Pressure => "hPa",
            Field::Altitude => "m",
            Field::GasResistance => "Ω",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One entry of a [`FieldSchema`]: a field position and whether the server
/// always emits it.
///
/// Optional fields (e.g. gas resistance on nodes without a BME680) may be
/// legitimately absent from a record; consumers can choose not to reserve
/// display space for them. Absent *required* fields still decode, as the
/// missing marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub required: bool,
}

const fn req(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        required: true,
    }
}

const fn opt(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        required: false,
    }
}

/// A declared payload record grammar: ordered fields plus separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    name: &'static str,
    separator: char,
    fields: &'static [FieldSpec],
}

/// Flat single-entity record from a BME280 node:
/// `"<unixSeconds> <t_dht11> <h_dht11> <t_env> <h_env> <p_env>"`.
pub static FLAT_BME280: FieldSchema = FieldSchema {
    name: "flat-bme280",
    separator: ' ',
    fields: &[
        req(Field::Timestamp),
        req(Field::TemperatureDht),
        req(Field::HumidityDht),
        req(Field::Temperature),
        req(Field::Humidity),
        req(Field::Pressure),
    ],
};

/// Flat single-entity record from a BME680 node: the BME280 layout plus
/// altitude and gas resistance.
pub static FLAT_BME680: FieldSchema = FieldSchema {
    name: "flat-bme680",
    separator: ' ',
    fields: &[
        req(Field::Timestamp),
        req(Field::TemperatureDht),
        req(Field::HumidityDht),
        req(Field::Temperature),
        req(Field::Humidity),
        req(Field::Pressure),
        opt(Field::Altitude),
        opt(Field::GasResistance),
    ],
};

/// Multi-entity snapshot line:
/// `"<id>;<unixSeconds>;<temp>;<hum>;<pressure>;<altitude>[;<gas>]"`.
pub static SNAPSHOT: FieldSchema = FieldSchema {
    name: "snapshot",
    separator: ';',
    fields: &[
        req(Field::EntityId),
        req(Field::Timestamp),
        req(Field::Temperature),
        req(Field::Humidity),
        req(Field::Pressure),
        req(Field::Altitude),
        opt(Field::GasResistance),
    ],
};

/// One historical sample tuple inside a history payload:
/// `"<id>,<unixSeconds>,<temp>,<hum>,<pressure>,<altitude>[,<gas>]"`.
pub static HISTORY_TUPLE: FieldSchema = FieldSchema {
    name: "history-tuple",
    separator: ',',
    fields: &[
        req(Field::EntityId),
        req(Field::Timestamp),
        req(Field::Temperature),
        req(Field::Humidity),
        req(Field::Pressure),
        req(Field::Altitude),
        opt(Field::GasResistance),
    ],
};

/// Bare-float body from the `/temperature` endpoint.
pub static SCALAR_TEMPERATURE: FieldSchema = FieldSchema {
    name: "scalar-temperature",
    separator: ' ',
    fields: &[req(Field::Temperature)],
};

/// Bare-float body from the `/humidity` endpoint.
pub static SCALAR_HUMIDITY: FieldSchema = FieldSchema {
    name: "scalar-humidity",
    separator: ' ',
    fields: &[req(Field::Humidity)],
};

static REGISTRY: &[&FieldSchema] = &[
    &FLAT_BME280,
    &FLAT_BME680,
    &SNAPSHOT,
    &HISTORY_TUPLE,
    &SCALAR_TEMPERATURE,
    &SCALAR_HUMIDITY,
];

impl FieldSchema {
    /// Schema name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The scalar separator. A space separator splits on any whitespace run.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Ordered field list.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Look up a built-in schema by its name.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownSchema`] if no schema has that name.
    pub fn by_name(name: &str) -> Result<&'static FieldSchema, ParseError> {
        REGISTRY
            .iter()
            .find(|s| s.name == name)
            .copied()
            .ok_or_else(|| ParseError::UnknownSchema(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_key_roundtrip() {
        for field in [
            Field::EntityId,
            Field::Timestamp,
            Field::TemperatureDht,
            Field::HumidityDht,
            Field::Temperature,
            Field::Humidity,
            Field::Pressure,
            Field::Altitude,
            Field::GasResistance,
        ] {
            assert_eq!(Field::from_key(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn unknown_field_key() {
        let err = Field::from_key("co2").unwrap_err();
        assert!(err.to_string().contains("co2"));
    }

    #[test]
    fn schema_lookup_by_name() {
        let schema = FieldSchema::by_name("flat-bme680").unwrap();
        assert_eq!(schema.fields().len(), 8);
        assert_eq!(schema.separator(), ' ');

        assert!(FieldSchema::by_name("flat-bme999").is_err());
    }

    #[test]
    fn snapshot_schema_layout() {
        let fields = SNAPSHOT.fields();
        assert_eq!(fields[0].field, Field::EntityId);
        assert_eq!(fields[1].field, Field::Timestamp);
        assert!(fields[6].field == Field::GasResistance && !fields[6].required);
    }

    #[test]
    fn numeric_classification() {
        assert!(!Field::EntityId.is_numeric());
        assert!(!Field::Timestamp.is_numeric());
        assert!(Field::Pressure.is_numeric());
    }
}
