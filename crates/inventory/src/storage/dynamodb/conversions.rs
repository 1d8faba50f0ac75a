//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and store records.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use inventory_core::storage::{Record, StoreError, StoreValue};

pub fn to_attribute_value(value: &StoreValue) -> AttributeValue {
    match value {
        StoreValue::S(s) => AttributeValue::S(s.clone()),
        StoreValue::N(n) => AttributeValue::N(n.clone()),
        StoreValue::Bool(b) => AttributeValue::Bool(*b),
        StoreValue::Null => AttributeValue::Null(true),
        StoreValue::L(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        StoreValue::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
        StoreValue::Ss(members) => AttributeValue::Ss(members.clone()),
        StoreValue::Ns(members) => AttributeValue::Ns(members.clone()),
    }
}

/// Binary attributes are never written by the store and are rejected on read.
pub fn from_attribute_value(name: &str, value: &AttributeValue) -> Result<StoreValue, StoreError> {
    Ok(match value {
        AttributeValue::S(s) => StoreValue::S(s.clone()),
        AttributeValue::N(n) => StoreValue::N(n.clone()),
        AttributeValue::Bool(b) => StoreValue::Bool(*b),
        AttributeValue::Null(_) => StoreValue::Null,
        AttributeValue::L(values) => StoreValue::L(
            values
                .iter()
                .map(|v| from_attribute_value(name, v))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => StoreValue::M(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_attribute_value(k, v)?)))
                .collect::<Result<_, StoreError>>()?,
        ),
        AttributeValue::Ss(members) => StoreValue::Ss(members.clone()),
        AttributeValue::Ns(members) => StoreValue::Ns(members.clone()),
        _ => {
            return Err(StoreError::ReadFailed(format!(
                "Unsupported attribute type for {name}"
            )))
        }
    })
}

/// Convert a store record to a DynamoDB item.
pub fn record_to_attributes(record: &Record) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

/// Convert a DynamoDB item to a store record.
pub fn attributes_to_record(item: &HashMap<String, AttributeValue>) -> Result<Record, StoreError> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_attribute_value(k, v)?)))
        .collect()
}
