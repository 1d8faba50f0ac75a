//! Conversions between caller JSON values and typed store values.
//!
//! Writes are strict: a value must fit the storage type declared for its field.
//! Reads are lossless: numbers come back as their decimal text.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use super::{FieldType, Item, Record, Result, StoreError, StoreValue};

/// Converts a caller value into the declared storage type.
pub fn to_store_value(field: &str, value: &Value, field_type: FieldType) -> Result<StoreValue> {
    let invalid = || StoreError::InvalidValue {
        field: field.to_string(),
        expected: field_type,
    };

    match field_type {
        FieldType::String => value
            .as_str()
            .map(|s| StoreValue::S(s.to_string()))
            .ok_or_else(invalid),
        FieldType::Number => number_text(value).map(StoreValue::N).ok_or_else(invalid),
        FieldType::Bool => value.as_bool().map(StoreValue::Bool).ok_or_else(invalid),
        FieldType::Null => match value {
            Value::Null | Value::Bool(true) => Ok(StoreValue::Null),
            _ => Err(invalid()),
        },
        FieldType::List => match value {
            Value::Array(values) => Ok(StoreValue::L(
                values.iter().map(infer_store_value).collect(),
            )),
            _ => Err(invalid()),
        },
        FieldType::Map => match value {
            Value::Object(_) => Ok(infer_store_value(value)),
            _ => Err(invalid()),
        },
        FieldType::StringSet => {
            let members = value
                .as_array()
                .and_then(|values| {
                    values
                        .iter()
                        .map(|v| v.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(invalid)?;
            distinct_members(members).map(StoreValue::Ss).ok_or_else(invalid)
        }
        FieldType::NumberSet => {
            let members = value
                .as_array()
                .and_then(|values| values.iter().map(number_text).collect::<Option<Vec<_>>>())
                .ok_or_else(invalid)?;
            distinct_members(members).map(StoreValue::Ns).ok_or_else(invalid)
        }
    }
}

/// Infers a storage type from the shape of a JSON value.
///
/// Used for the members of lists and maps, which carry no declared type.
pub fn infer_store_value(value: &Value) -> StoreValue {
    match value {
        Value::Null => StoreValue::Null,
        Value::Bool(b) => StoreValue::Bool(*b),
        Value::Number(n) => StoreValue::N(n.to_string()),
        Value::String(s) => StoreValue::S(s.clone()),
        Value::Array(values) => StoreValue::L(values.iter().map(infer_store_value).collect()),
        Value::Object(map) => StoreValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), infer_store_value(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Converts a stored value back into plain JSON.
pub fn to_plain_value(value: &StoreValue) -> Value {
    match value {
        StoreValue::S(s) | StoreValue::N(s) => Value::String(s.clone()),
        StoreValue::Bool(b) => Value::Bool(*b),
        StoreValue::Null => Value::Null,
        StoreValue::L(values) => Value::Array(values.iter().map(to_plain_value).collect()),
        StoreValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_plain_value(v)))
                .collect::<Map<_, _>>(),
        ),
        StoreValue::Ss(members) | StoreValue::Ns(members) => {
            Value::Array(members.iter().cloned().map(Value::String).collect())
        }
    }
}

/// Converts a stored record into a caller-facing item.
pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_plain_value(v)))
        .collect()
}

/// Decimal text of a JSON number, or of a string holding a finite number.
fn number_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|_| trimmed.to_string())
        }
        _ => None,
    }
}

/// Sets must be non-empty and free of duplicates.
fn distinct_members(members: Vec<String>) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    if members.is_empty() || !members.iter().all(|m| seen.insert(m.as_str())) {
        return None;
    }
    Some(members)
}
