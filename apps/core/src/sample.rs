use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::LatLon;

/// Field names fixed by the tracking service schema.
pub const LATITUDE_FIELD: &str = "LATITUDE";
pub const LONGITUDE_FIELD: &str = "LONGITUDE";
pub const TIMESTAMP_FIELD: &str = "TIMESTAMP";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Opaque token naming one tracked animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl Identifier {
    /// Accepts JSON strings and numbers; anything else is not an identifier.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => Some(Self::Number(number.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A trajectory record that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub position: LatLon,
    pub timestamp: String,
}

impl TrajectorySample {
    /// Validates one raw record. Returns `None` when either coordinate is not
    /// a finite in-range number or the timestamp is missing or falsy.
    pub fn from_record(record: &Value) -> Option<Self> {
        let lat = coordinate(record.get(LATITUDE_FIELD)?)?;
        let lon = coordinate(record.get(LONGITUDE_FIELD)?)?;
        let timestamp = timestamp_text(record.get(TIMESTAMP_FIELD)?)?;

        let position = LatLon::new(lat, lon);
        if !position.is_in_range() {
            return None;
        }

        Some(Self {
            position,
            timestamp,
        })
    }

    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Keeps the valid records, in their original order.
pub fn valid_samples(records: &[Value]) -> Vec<TrajectorySample> {
    records
        .iter()
        .filter_map(TrajectorySample::from_record)
        .collect()
}

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Any truthy JSON value counts as a timestamp. Strings are kept as they are,
/// everything else in its JSON form.
fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_exactly_the_non_numeric_latitude() {
        let records = vec![
            json!({"LATITUDE": 52.0, "LONGITUDE": 4.0, "TIMESTAMP": "2014-08-15 00:00:00"}),
            json!({"LATITUDE": "north", "LONGITUDE": 4.1, "TIMESTAMP": "2014-08-15 01:00:00"}),
            json!({"LATITUDE": "52.2", "LONGITUDE": "4.2", "TIMESTAMP": "2014-08-15 02:00:00"}),
            json!({"LATITUDE": 52.3, "LONGITUDE": 4.3, "TIMESTAMP": "2014-08-15 03:00:00"}),
        ];

        let samples = valid_samples(&records);
        let timestamps: Vec<_> = samples.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(
            timestamps,
            [
                "2014-08-15 00:00:00",
                "2014-08-15 02:00:00",
                "2014-08-15 03:00:00"
            ]
        );
        assert_eq!(samples[1].position, LatLon::new(52.2, 4.2));
    }

    #[test]
    fn missing_or_falsy_timestamp_is_invalid() {
        let missing = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0});
        let empty = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": ""});
        let zero = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": 0});
        let null = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": null});
        let no = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": false});
        let epoch = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": 1_408_060_800});

        assert!(TrajectorySample::from_record(&missing).is_none());
        assert!(TrajectorySample::from_record(&empty).is_none());
        assert!(TrajectorySample::from_record(&zero).is_none());
        assert!(TrajectorySample::from_record(&null).is_none());
        assert!(TrajectorySample::from_record(&no).is_none());
        assert_eq!(
            TrajectorySample::from_record(&epoch).map(|s| s.timestamp),
            Some("1408060800".to_string())
        );
    }

    #[test]
    fn other_truthy_timestamps_are_kept_as_json() {
        let timestamp = |value: Value| {
            let record = json!({"LATITUDE": 1.0, "LONGITUDE": 2.0, "TIMESTAMP": value});
            TrajectorySample::from_record(&record).map(|s| s.timestamp)
        };

        assert_eq!(timestamp(json!(true)), Some("true".to_string()));
        assert_eq!(timestamp(json!({})), Some("{}".to_string()));
        assert_eq!(timestamp(json!([1])), Some("[1]".to_string()));
        assert_eq!(timestamp(json!(-0.5)), Some("-0.5".to_string()));
    }

    #[test]
    fn out_of_range_and_non_finite_coordinates_are_invalid() {
        let too_far_north = json!({"LATITUDE": 91.0, "LONGITUDE": 0.0, "TIMESTAMP": "t"});
        let nan_text = json!({"LATITUDE": "NaN", "LONGITUDE": 0.0, "TIMESTAMP": "t"});
        let blank = json!({"LATITUDE": " ", "LONGITUDE": 0.0, "TIMESTAMP": "t"});
        let not_an_object = json!([1.0, 2.0]);

        assert!(TrajectorySample::from_record(&too_far_north).is_none());
        assert!(TrajectorySample::from_record(&nan_text).is_none());
        assert!(TrajectorySample::from_record(&blank).is_none());
        assert!(TrajectorySample::from_record(&not_an_object).is_none());
    }

    #[test]
    fn identifiers_display_as_query_text() {
        let text = Identifier::from_json(&json!("A1"));
        let number = Identifier::from_json(&json!(4012));

        assert_eq!(text.map(|id| id.to_string()), Some("A1".to_string()));
        assert_eq!(number.map(|id| id.to_string()), Some("4012".to_string()));
        assert!(Identifier::from_json(&json!(null)).is_none());
        assert!(Identifier::from_json(&json!({"id": 1})).is_none());
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert!(parse_timestamp("2009-05-27 14:00:00.000").is_some());
        assert!(parse_timestamp("2009-05-27T14:00:00").is_some());
        assert!(parse_timestamp("2009-05-27T14:00:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
