//! Parsing of `grib_dump -j` output into grid records.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use wind_common::{GridRecord, WindError, WindResult};

/// Number of points along a parallel.
pub const WIDTH_KEY: &str = "Ni";
/// Number of points along a meridian. Used as-is, with no off-by-one adjustment.
pub const HEIGHT_KEY: &str = "Nj";
pub const MINIMUM_KEY: &str = "minimum";
pub const MAXIMUM_KEY: &str = "maximum";
pub const VALUES_KEY: &str = "values";

/// One `{ "key": .., "value": .. }` entry of a dumped message.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRecord {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Structured dump of a GRIB file as produced by `grib_dump -j`.
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredDump {
    messages: Vec<Vec<FieldRecord>>,
}

impl StructuredDump {
    /// Parse JSON bytes, requiring at least one message.
    pub fn from_slice(bytes: &[u8]) -> WindResult<Self> {
        let dump: StructuredDump = serde_json::from_slice(bytes)
            .map_err(|e| WindError::MalformedDump(format!("invalid JSON: {}", e)))?;

        if dump.messages.is_empty() {
            return Err(WindError::MalformedDump(
                "dump contains no messages".to_string(),
            ));
        }

        debug!(
            messages = dump.messages.len(),
            fields = dump.messages[0].len(),
            "Parsed grid dump"
        );
        Ok(dump)
    }

    /// Field records of the first message.
    pub fn first_message(&self) -> &[FieldRecord] {
        self.messages.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of messages in the dump.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Look up a field by name in the first message.
///
/// Linear search; the first record with a matching key wins. Returns `None`
/// for unknown keys.
pub fn extract<'a>(dump: &'a StructuredDump, key: &str) -> Option<&'a Value> {
    dump.first_message()
        .iter()
        .find(|record| record.key == key)
        .map(|record| &record.value)
}

fn require<'a>(dump: &'a StructuredDump, key: &str) -> WindResult<&'a Value> {
    extract(dump, key).ok_or_else(|| WindError::FieldNotFound(key.to_string()))
}

fn dimension(dump: &StructuredDump, key: &str) -> WindResult<usize> {
    let value = require(dump, key)?;
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            WindError::MalformedDump(format!(
                "field '{}' must be a positive integer, got {}",
                key, value
            ))
        })
}

fn samples(dump: &StructuredDump) -> WindResult<Vec<f64>> {
    let value = require(dump, VALUES_KEY)?;
    let array = value.as_array().ok_or_else(|| {
        WindError::MalformedDump(format!("field '{}' is not an array", VALUES_KEY))
    })?;

    array
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                WindError::MalformedDump(format!(
                    "field '{}' has non-numeric entry {} at index {}",
                    VALUES_KEY, v, i
                ))
            })
        })
        .collect()
}

/// Decode the first message of a dump into a typed grid record.
///
/// `Ni`, `Nj` and `values` are required. `minimum` and `maximum` are kept
/// when present but never required.
pub fn decode_record(dump: &StructuredDump) -> WindResult<GridRecord> {
    let width = dimension(dump, WIDTH_KEY)?;
    let height = dimension(dump, HEIGHT_KEY)?;
    let samples = samples(dump)?;

    let minimum = extract(dump, MINIMUM_KEY).and_then(Value::as_f64);
    let maximum = extract(dump, MAXIMUM_KEY).and_then(Value::as_f64);

    let record = GridRecord::new(width, height, samples)?.with_extrema(minimum, maximum);
    debug!(
        width,
        height,
        minimum = ?minimum,
        maximum = ?maximum,
        "Decoded grid record"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dump(fields: Value) -> StructuredDump {
        let doc = json!({ "messages": [fields] });
        StructuredDump::from_slice(doc.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_extract_unknown_key_is_absent() {
        let d = dump(json!([{ "key": "Ni", "value": 2 }]));
        assert!(extract(&d, "Nx").is_none());
    }

    #[test]
    fn test_extract_first_match_wins() {
        let d = dump(json!([
            { "key": "Ni", "value": 4 },
            { "key": "Ni", "value": 8 }
        ]));
        assert_eq!(extract(&d, "Ni"), Some(&json!(4)));
    }

    #[test]
    fn test_extract_only_reads_first_message() {
        let doc = json!({ "messages": [
            [{ "key": "Ni", "value": 1 }],
            [{ "key": "Nj", "value": 1 }]
        ]});
        let d = StructuredDump::from_slice(doc.to_string().as_bytes()).unwrap();
        assert_eq!(d.message_count(), 2);
        assert!(extract(&d, "Nj").is_none());
    }

    #[test]
    fn test_missing_messages_is_malformed() {
        let err = StructuredDump::from_slice(br#"{"messages": []}"#).unwrap_err();
        assert!(matches!(err, WindError::MalformedDump(_)));

        let err = StructuredDump::from_slice(br#"{"other": 1}"#).unwrap_err();
        assert!(matches!(err, WindError::MalformedDump(_)));

        let err = StructuredDump::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, WindError::MalformedDump(_)));
    }

    #[test]
    fn test_decode_record() {
        let d = dump(json!([
            { "key": "Ni", "value": 3 },
            { "key": "Nj", "value": 2 },
            { "key": "minimum", "value": -1.5 },
            { "key": "maximum", "value": 6 },
            { "key": "values", "value": [1, 2, 3, 4, 5.5, -1.5] }
        ]));
        let record = decode_record(&d).unwrap();
        assert_eq!(record.width(), 3);
        assert_eq!(record.height(), 2);
        assert_eq!(record.samples(), &[1.0, 2.0, 3.0, 4.0, 5.5, -1.5]);
        assert_eq!(record.minimum(), Some(-1.5));
        assert_eq!(record.maximum(), Some(6.0));
    }

    #[test]
    fn test_decode_tolerates_missing_extrema() {
        let d = dump(json!([
            { "key": "Ni", "value": 1 },
            { "key": "Nj", "value": 1 },
            { "key": "values", "value": [0.25] }
        ]));
        let record = decode_record(&d).unwrap();
        assert_eq!(record.minimum(), None);
        assert_eq!(record.maximum(), None);
    }

    #[test]
    fn test_decode_requires_dimensions_and_values() {
        let d = dump(json!([
            { "key": "Nj", "value": 1 },
            { "key": "values", "value": [0.25] }
        ]));
        match decode_record(&d) {
            Err(WindError::FieldNotFound(key)) => assert_eq!(key, "Ni"),
            other => panic!("expected FieldNotFound, got {:?}", other),
        }

        let d = dump(json!([
            { "key": "Ni", "value": 1 },
            { "key": "Nj", "value": 1 }
        ]));
        match decode_record(&d) {
            Err(WindError::FieldNotFound(key)) => assert_eq!(key, "values"),
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        let d = dump(json!([
            { "key": "Ni", "value": "wide" },
            { "key": "Nj", "value": 1 },
            { "key": "values", "value": [0.0] }
        ]));
        assert!(matches!(decode_record(&d), Err(WindError::MalformedDump(_))));

        let d = dump(json!([
            { "key": "Ni", "value": 2 },
            { "key": "Nj", "value": 2 },
            { "key": "values", "value": [0.0, 1.0, 2.0] }
        ]));
        assert!(matches!(decode_record(&d), Err(WindError::MalformedDump(_))));

        let d = dump(json!([
            { "key": "Ni", "value": 1 },
            { "key": "Nj", "value": 1 },
            { "key": "values", "value": [null] }
        ]));
        assert!(matches!(decode_record(&d), Err(WindError::MalformedDump(_))));
    }
}
