//! Decoded sensor samples.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema::Field;

/// Parse a numeric payload field.
///
/// Empty or non-numeric input yields `f64::NAN`, the explicit missing
/// marker. A missing sensor must show as absent, not as zero; the marker is
/// propagated all the way to the rendering layer, which decides the fallback
/// display.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// One entity's decoded sample for one ingestion cycle.
///
/// Numeric fields hold either a valid value or `f64::NAN` as the missing
/// marker, never a substituted zero. Fields the record's schema does not
/// mention stay at the marker. JSON serialization maps the marker to `null`
/// (and `null` back to the marker) so encoded readings stay valid JSON.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Node identifier, when the grammar carries one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entity_id: Option<String>,
    /// Sample time in unix seconds, when the grammar carries one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<i64>,
    /// DHT11 temperature in °C.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub temperature_dht11: f64,
    /// DHT11 relative humidity in %.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub humidity_dht11: f64,
    /// Environmental sensor temperature in °C.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub temperature: f64,
    /// Environmental sensor relative humidity in %.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub humidity: f64,
    /// Atmospheric pressure in hPa.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub pressure: f64,
    /// Estimated altitude in m.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub altitude: f64,
    /// Gas resistance in Ω.
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub gas_resistance: f64,
}

fn missing() -> f64 {
    f64::NAN
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            entity_id: None,
            timestamp: None,
            temperature_dht11: f64::NAN,
            humidity_dht11: f64::NAN,
            temperature: f64::NAN,
            humidity: f64::NAN,
            pressure: f64::NAN,
            altitude: f64::NAN,
            gas_resistance: f64::NAN,
        }
    }
}

impl Reading {
    /// Set a field from its raw payload text.
    pub fn set(&mut self, field: Field, raw: &str) {
        match field {
            Field::EntityId => {
                let trimmed = raw.trim();
                self.entity_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            Field::Timestamp => self.timestamp = raw.trim().parse().ok(),
            Field::TemperatureDht => self.temperature_dht11 = parse_number(raw),
            Field::HumidityDht => self.humidity_dht11 = parse_number(raw),
            Field::Temperature => self.temperature = parse_number(raw),
            Field::Humidity => self.humidity = parse_number(raw),
            Field::Pressure => self.pressure = parse_number(raw),
            Field::Altitude => self.altitude = parse_number(raw),
            Field::GasResistance => self.gas_resistance = parse_number(raw),
        }
    }

    /// Numeric value of a field; the missing marker for `EntityId` and
    /// `Timestamp`, which are not chartable.
    pub fn number(&self, field: Field) -> f64 {
        match field {
            Field::EntityId | Field::Timestamp => f64::NAN,
            Field::TemperatureDht => self.temperature_dht11,
            Field::HumidityDht => self.humidity_dht11,
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::Pressure => self.pressure,
            Field::Altitude => self.altitude,
            Field::GasResistance => self.gas_resistance,
        }
    }

    /// Whether a field holds a usable value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::EntityId => self.entity_id.is_some(),
            Field::Timestamp => self.timestamp.is_some(),
            _ => !self.number(field).is_nan(),
        }
    }

    /// Build a chart point for one field of this reading.
    ///
    /// The point carries the sample's own timestamp when the grammar had one
    /// (in milliseconds), otherwise `fallback_ms`, the receipt time that the
    /// scalar feeds chart against.
    pub fn series_point(&self, field: Field, fallback_ms: i64) -> SeriesPoint {
        let timestamp_ms = self.timestamp.map_or(fallback_ms, |s| s * 1000);
        SeriesPoint {
            timestamp_ms,
            value: self.number(field),
        }
    }
}

/// One chart point: `(timestamp in milliseconds, value)`.
///
/// Belongs to exactly one (entity, field) series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesPoint {
    pub timestamp_ms: i64,
    #[cfg_attr(feature = "serde", serde(with = "nan_null", default = "missing"))]
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Serde adapter mapping the NaN missing marker to JSON `null`.
#[cfg(feature = "serde")]
mod nan_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_number_valid() {
        assert_eq!(parse_number("21.5"), 21.5);
        assert_eq!(parse_number(" 1013.2 "), 1013.2);
        assert_eq!(parse_number("-7"), -7.0);
    }

    #[test]
    fn parse_number_missing() {
        assert!(parse_number("").is_nan());
        assert!(parse_number("   ").is_nan());
        assert!(parse_number("n/a").is_nan());
        assert!(parse_number("21.5C").is_nan());
    }

    #[test]
    fn default_reading_is_all_missing() {
        let reading = Reading::default();
        assert!(reading.entity_id.is_none());
        assert!(reading.timestamp.is_none());
        assert!(reading.temperature.is_nan());
        assert!(reading.gas_resistance.is_nan());
        assert!(!reading.has(Field::Humidity));
    }

    #[test]
    fn set_and_read_back() {
        let mut reading = Reading::default();
        reading.set(Field::EntityId, "living_room");
        reading.set(Field::Timestamp, "1700000000");
        reading.set(Field::Temperature, "21.8");
        reading.set(Field::Humidity, "");

        assert_eq!(reading.entity_id.as_deref(), Some("living_room"));
        assert_eq!(reading.timestamp, Some(1_700_000_000));
        assert_eq!(reading.number(Field::Temperature), 21.8);
        assert!(reading.number(Field::Humidity).is_nan());
        assert!(reading.has(Field::Temperature));
        assert!(!reading.has(Field::Humidity));
    }

    #[test]
    fn series_point_prefers_sample_time() {
        let mut reading = Reading::default();
        reading.set(Field::Timestamp, "1700000000");
        reading.set(Field::Temperature, "21.5");

        let point = reading.series_point(Field::Temperature, 99);
        assert_eq!(point.timestamp_ms, 1_700_000_000_000);
        assert_eq!(point.value, 21.5);
    }

    #[test]
    fn series_point_falls_back_to_receipt_time() {
        let mut reading = Reading::default();
        reading.set(Field::Temperature, "21.5");

        let point = reading.series_point(Field::Temperature, 1_700_000_000_123);
        assert_eq!(point.timestamp_ms, 1_700_000_000_123);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_serializes_as_null() {
        let mut reading = Reading::default();
        reading.set(Field::Temperature, "21.5");

        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"temperature\":21.5"));
        assert!(json.contains("\"humidity\":null"));

        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back.temperature, 21.5);
        assert!(back.humidity.is_nan());
    }

    proptest! {
        #[test]
        fn parse_number_roundtrips_formatting(value in -1000.0f64..1000.0) {
            let formatted = format!("{}", value);
            let parsed = parse_number(&formatted);
            prop_assert!((parsed - value).abs() < 1e-9);
        }
    }
}
