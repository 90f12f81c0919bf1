//! Schema mapper
//!
//! Converts one raw JSON record, as delivered by the resource endpoints, into
//! a typed domain object. The server speaks PascalCase/camelCase; every key is
//! normalized to snake_case first, then the record is deserialized.
//!
//! Mapping is a pure transform. The input record is never mutated, unknown
//! fields are dropped, and missing optional fields end up as `None`/empty.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::errors::{Result, WowiError};

/// Timestamp layouts accepted for ticket and comment times, tried in order.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Conversion from one raw record into a typed domain object.
pub trait FromRecord: Sized {
    /// Map a single raw record.
    ///
    /// # Errors
    /// Returns [`WowiError::Decode`] when a required field is missing or has
    /// the wrong shape.
    fn from_record(record: &Value) -> Result<Self>;
}

/// Map one raw record.
///
/// # Errors
/// See [`FromRecord::from_record`].
pub fn map_record<T: FromRecord>(record: &Value) -> Result<T> {
    T::from_record(record)
}

/// Map a page (or a merged collection) of raw records, preserving order.
///
/// # Errors
/// Fails on the first record that cannot be mapped.
pub fn map_records<T: FromRecord>(records: &[Value]) -> Result<Vec<T>> {
    records.iter().map(T::from_record).collect()
}

/// Normalize keys, then deserialize into `T`.
///
/// # Errors
/// Returns [`WowiError::Decode`] naming the target type.
pub fn deserialize_normalized<T: DeserializeOwned>(record: &Value) -> Result<T> {
    serde_json::from_value(normalize_keys(record)).map_err(|e| {
        WowiError::Decode(format!("cannot map record to {}: {}", std::any::type_name::<T>(), e))
    })
}

/// Field deserializer treating an explicit `null` like a missing field.
///
/// Endpoints queried with `showNullValues=true` send `null` for empty lists
/// and flags; pair with `#[serde(default)]`.
pub fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Field deserializer for optional API timestamps, see [`parse_timestamp`].
pub fn opt_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Return a copy of `value` with every object key converted to snake_case,
/// recursively.
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let normalized: Map<String, Value> =
                map.iter().map(|(key, inner)| (to_snake_case(key), normalize_keys(inner))).collect();
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_keys).collect()),
        other => other.clone(),
    }
}

/// Convert a PascalCase or camelCase identifier to snake_case.
///
/// Acronyms collapse into one word (`IBAN` → `iban`, `HTTPServer` →
/// `http_server`); digits stick to the preceding word (`LongName1` →
/// `long_name1`). Already snake_case input is returned unchanged.
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Parse an API timestamp carrying a UTC offset, with or without fractional
/// seconds.
///
/// # Errors
/// Returns [`WowiError::Decode`] if no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
        .ok_or_else(|| WowiError::Decode(format!("unrecognized timestamp: {raw}")))
}
