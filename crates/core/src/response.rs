//! Uniform response envelope.
//!
//! Every processed request is answered with `{result, message, ...payload}`.
//! Numbers are rendered as decimal strings at any depth.

use serde::Serialize;
use serde_json::Value;

use crate::storage::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<P> {
    pub result: Outcome,
    pub message: String,
    #[serde(flatten)]
    pub payload: P,
}

impl<P: Serialize> Envelope<P> {
    pub fn new(result: impl Into<Outcome>, message: impl Into<String>, payload: P) -> Self {
        Self {
            result: result.into(),
            message: message.into(),
            payload,
        }
    }

    pub fn success(payload: P) -> Self {
        Self::new(Outcome::Success, "", payload)
    }

    pub fn failure(message: impl Into<String>, payload: P) -> Self {
        Self::new(Outcome::Failure, message, payload)
    }

    /// Serializes the envelope with every number turned into its decimal string.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        serde_json::to_string(&stringify_numbers(value))
    }
}

/// Payload of the components endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Components {
    pub components: Vec<Item>,
}

impl Components {
    pub fn new(components: Vec<Item>) -> Self {
        Self { components }
    }
}

/// Replaces every JSON number with its decimal string.
pub fn stringify_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Array(values) => Value::Array(values.into_iter().map(stringify_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, stringify_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_renders_success_with_components() {
        let envelope = Envelope::success(Components::new(vec![item(json!({"pk": "org-1"}))]));
        let rendered: Value = serde_json::from_str(&envelope.render().unwrap()).unwrap();

        assert_eq!(
            rendered,
            json!({"result": "success", "message": "", "components": [{"pk": "org-1"}]})
        );
    }

    #[test]
    fn test_renders_numbers_as_strings_at_any_depth() {
        let envelope = Envelope::success(Components::new(vec![item(json!({
            "quantity": 12,
            "price": 1.5,
            "dimensions": {"sizes": [3, 4], "in_stock": true},
        }))]));
        let rendered: Value = serde_json::from_str(&envelope.render().unwrap()).unwrap();

        assert_eq!(
            rendered["components"][0],
            json!({
                "quantity": "12",
                "price": "1.5",
                "dimensions": {"sizes": ["3", "4"], "in_stock": true},
            })
        );
    }

    #[test]
    fn test_failure_carries_message() {
        let envelope = Envelope::failure("no edit permission", Components::default());
        let rendered: Value = serde_json::from_str(&envelope.render().unwrap()).unwrap();

        assert_eq!(rendered["result"], "failure");
        assert_eq!(rendered["message"], "no edit permission");
        assert_eq!(rendered["components"], json!([]));
    }

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Success);
        assert_eq!(Outcome::from(false), Outcome::Failure);
    }
}
