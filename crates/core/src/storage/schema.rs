//! Declarative table schema.
//!
//! A [`TableSchema`] names the partition key, the optional sort key layout and the
//! storage type of every attribute the store is allowed to write.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SchemaError, SortKeyCodec};

/// Storage type tag of an attribute, spelled the way the wide-column store spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "BOOL")]
    Bool,
    #[serde(rename = "NULL")]
    Null,
    #[serde(rename = "L")]
    List,
    #[serde(rename = "M")]
    Map,
    #[serde(rename = "SS")]
    StringSet,
    #[serde(rename = "NS")]
    NumberSet,
}

impl FieldType {
    /// The wire tag for this type (`S`, `N`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Bool => "BOOL",
            Self::Null => "NULL",
            Self::List => "L",
            Self::Map => "M",
            Self::StringSet => "SS",
            Self::NumberSet => "NS",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::String),
            "N" => Ok(Self::Number),
            "BOOL" => Ok(Self::Bool),
            "NULL" => Ok(Self::Null),
            "L" => Ok(Self::List),
            "M" => Ok(Self::Map),
            "SS" => Ok(Self::StringSet),
            "NS" => Ok(Self::NumberSet),
            other => Err(format!("unknown field type tag: {other}")),
        }
    }
}

/// Attribute name to storage type.
pub type FieldTypes = HashMap<String, FieldType>;

/// How the sort key of a table is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Value is copied verbatim from the caller's item.
    Plain { name: String },
    /// Value is `prefix<delimiter>id`, where `id` is generated on every put.
    Composite {
        name: String,
        prefix_field: String,
        suffix_field: String,
        codec: SortKeyCodec,
    },
}

impl SortKey {
    /// Attribute name of the sort key itself.
    pub fn name(&self) -> &str {
        match self {
            Self::Plain { name } | Self::Composite { name, .. } => name,
        }
    }
}

/// Immutable description of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    partition_key: String,
    sort_key: Option<SortKey>,
    field_types: FieldTypes,
}

impl TableSchema {
    /// Schema with a partition key only.
    pub fn new(partition_key: impl Into<String>, field_types: FieldTypes) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
            field_types,
        }
    }

    /// Adds a sort key whose value is taken verbatim from the caller.
    pub fn with_plain_sort_key(mut self, name: impl Into<String>) -> Self {
        self.sort_key = Some(SortKey::Plain { name: name.into() });
        self
    }

    /// Adds a composite sort key `prefix<delimiter>id`.
    pub fn with_composite_sort_key(
        mut self,
        name: impl Into<String>,
        prefix_field: impl Into<String>,
        suffix_field: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Self {
        self.sort_key = Some(SortKey::Composite {
            name: name.into(),
            prefix_field: prefix_field.into(),
            suffix_field: suffix_field.into(),
            codec: SortKeyCodec::new(delimiter),
        });
        self
    }

    /// Builds a schema from the flat layout used by configuration.
    ///
    /// An empty `sort_key` means the table has no sort key; an empty `delimiter`
    /// means the sort key is a plain scalar.
    pub fn from_layout(
        partition_key: &str,
        sort_key: &str,
        prefix_field: &str,
        suffix_field: &str,
        delimiter: &str,
        field_types: FieldTypes,
    ) -> Result<Self, SchemaError> {
        if partition_key.is_empty() {
            return Err(SchemaError::EmptyPartitionKey);
        }

        let schema = Self::new(partition_key, field_types);
        if sort_key.is_empty() {
            return Ok(schema);
        }
        if delimiter.is_empty() {
            return Ok(schema.with_plain_sort_key(sort_key));
        }
        if prefix_field.is_empty() {
            return Err(SchemaError::IncompleteSortKey("prefix"));
        }
        if suffix_field.is_empty() {
            return Err(SchemaError::IncompleteSortKey("suffix"));
        }

        Ok(schema.with_composite_sort_key(sort_key, prefix_field, suffix_field, delimiter))
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort_key.as_ref()
    }

    pub fn field_types(&self) -> &FieldTypes {
        &self.field_types
    }

    /// Declared storage type of an attribute.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field_types.get(name).copied()
    }

    /// Storage type used for key attributes; undeclared keys are strings.
    pub fn key_type(&self, name: &str) -> FieldType {
        self.field_type(name).unwrap_or(FieldType::String)
    }

    /// The field that selects a prefix query, when the sort key is composite.
    pub fn sort_key_prefix_field(&self) -> Option<&str> {
        match &self.sort_key {
            Some(SortKey::Composite { prefix_field, .. }) => Some(prefix_field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_types() -> FieldTypes {
        HashMap::from([
            ("pk".to_string(), FieldType::String),
            ("quantity".to_string(), FieldType::Number),
        ])
    }

    #[test]
    fn test_field_type_tags_round_trip() {
        for tag in ["S", "N", "BOOL", "NULL", "L", "M", "SS", "NS"] {
            let parsed: FieldType = tag.parse().unwrap();
            assert_eq!(parsed.tag(), tag);
        }
        assert!("X".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_types_deserialize_from_json() {
        let parsed: FieldTypes =
            serde_json::from_str(r#"{"pk": "S", "quantity": "N", "tags": "SS"}"#).unwrap();
        assert_eq!(parsed["quantity"], FieldType::Number);
        assert_eq!(parsed["tags"], FieldType::StringSet);
    }

    #[test]
    fn test_layout_without_sort_key() {
        let schema = TableSchema::from_layout("pk", "", "", "", "", field_types()).unwrap();
        assert_eq!(schema.partition_key(), "pk");
        assert!(schema.sort_key().is_none());
        assert_eq!(schema.sort_key_prefix_field(), None);
    }

    #[test]
    fn test_layout_with_plain_sort_key() {
        let schema = TableSchema::from_layout("pk", "sk", "", "", "", field_types()).unwrap();
        assert_eq!(
            schema.sort_key(),
            Some(&SortKey::Plain {
                name: "sk".to_string()
            })
        );
    }

    #[test]
    fn test_layout_with_composite_sort_key() {
        let schema =
            TableSchema::from_layout("pk", "sk", "category", "id", "#", field_types()).unwrap();
        assert_eq!(schema.sort_key().map(SortKey::name), Some("sk"));
        assert_eq!(schema.sort_key_prefix_field(), Some("category"));
    }

    #[test]
    fn test_layout_rejects_empty_partition_key() {
        let result = TableSchema::from_layout("", "", "", "", "", field_types());
        assert_eq!(result, Err(SchemaError::EmptyPartitionKey));
    }

    #[test]
    fn test_layout_rejects_composite_without_suffix() {
        let result = TableSchema::from_layout("pk", "sk", "category", "", "#", field_types());
        assert_eq!(result, Err(SchemaError::IncompleteSortKey("suffix")));
    }

    #[test]
    fn test_key_type_defaults_to_string() {
        let schema = TableSchema::new("pk", field_types());
        assert_eq!(schema.key_type("quantity"), FieldType::Number);
        assert_eq!(schema.key_type("undeclared"), FieldType::String);
    }
}
