//! Field extraction for loosely-typed catalog records.
//!
//! Each helper returns the field's default when the field is missing or has
//! the wrong JSON type, so a single bad field never rejects a whole record.

use serde_json::{Map, Value};

/// A string field, or `""`.
pub(crate) fn string_field(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// An optional string field; wrong types count as missing.
pub(crate) fn optional_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// A list of strings with non-string entries filtered out, or `[]`.
pub(crate) fn string_list(record: &Map<String, Value>, key: &str) -> Vec<String> {
    match record.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// A boolean field, or `false`.
pub(crate) fn bool_field(record: &Map<String, Value>, key: &str) -> bool {
    matches!(record.get(key), Some(Value::Bool(true)))
}

/// A positive level. Fractions are floored; zero, negatives, non-finite
/// numbers, and non-numeric values all mean "no level".
pub(crate) fn positive_level(value: Option<&Value>) -> Option<u32> {
    let raw = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() || raw < 1.0 {
        return None;
    }
    Some(raw.floor().min(f64::from(u32::MAX)) as u32)
}
