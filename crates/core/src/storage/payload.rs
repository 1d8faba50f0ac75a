//! Normalization of batch delete payloads.

use serde_json::Value;

/// Turns a delete payload into the list of key entries it describes.
///
/// - an array is taken as the list of entries
/// - a string is parsed as JSON: an array becomes the list, any other JSON value
///   becomes the single entry
/// - a string that is not JSON becomes a single entry holding the raw text
/// - any other value is a single entry
///
/// The raw-text case is kept for compatibility with older clients and always fails
/// key validation downstream.
pub fn normalize_delete_payload(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(entries) => entries,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => vec![other],
            Err(e) => {
                tracing::warn!(error = %e, "Delete payload is not JSON text, using it as one entry");
                vec![Value::String(text)]
            }
        },
        other => vec![other],
    }
}
