//! DynamoDB expression builders.
//!
//! Attribute names and values are always bound through placeholders, so any
//! attribute name is safe to use.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use inventory_core::storage::{KeyCondition, StoreValue};

use super::conversions::to_attribute_value;

/// An expression with its placeholder bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Pattern: `SET #f0 = :v0, #f1 = :v1, ...`
pub fn update_expression(set: &[(String, StoreValue)]) -> Expression {
    let mut names = HashMap::with_capacity(set.len());
    let mut values = HashMap::with_capacity(set.len());
    let mut assignments = Vec::with_capacity(set.len());

    for (index, (field, value)) in set.iter().enumerate() {
        let name = format!("#f{index}");
        let placeholder = format!(":v{index}");
        assignments.push(format!("{name} = {placeholder}"));
        names.insert(name, field.clone());
        values.insert(placeholder, to_attribute_value(value));
    }

    Expression {
        expression: format!("SET {}", assignments.join(", ")),
        names,
        values,
    }
}

/// Pattern: `#pk = :pk` or `#pk = :pk AND begins_with(#sk, :sk_prefix)`
pub fn key_condition_expression(condition: &KeyCondition) -> Expression {
    let mut names = HashMap::from([("#pk".to_string(), condition.partition_key.clone())]);
    let mut values = HashMap::from([(
        ":pk".to_string(),
        to_attribute_value(&condition.partition_value),
    )]);

    let expression = match &condition.sort_key_prefix {
        None => "#pk = :pk".to_string(),
        Some(prefix) => {
            names.insert("#sk".to_string(), prefix.attribute.clone());
            values.insert(
                ":sk_prefix".to_string(),
                AttributeValue::S(prefix.prefix.clone()),
            );
            "#pk = :pk AND begins_with(#sk, :sk_prefix)".to_string()
        }
    };

    Expression {
        expression,
        names,
        values,
    }
}
