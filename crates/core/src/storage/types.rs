use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// A caller-facing item: plain JSON object.
pub type Item = Map<String, Value>;

/// A typed attribute value as it is handed to the table.
///
/// Numbers are carried as their decimal string so no precision is lost on the way
/// to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    S(String),
    N(String),
    Bool(bool),
    Null,
    L(Vec<StoreValue>),
    M(BTreeMap<String, StoreValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
}

impl StoreValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }
}

/// A typed item as the table stores it.
pub type Record = BTreeMap<String, StoreValue>;

/// Optional `begins_with` restriction on the sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKeyPrefix {
    pub attribute: String,
    pub prefix: String,
}

/// Key condition for a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub partition_key: String,
    pub partition_value: StoreValue,
    pub sort_key_prefix: Option<SortKeyPrefix>,
}

impl KeyCondition {
    pub fn partition(name: impl Into<String>, value: StoreValue) -> Self {
        Self {
            partition_key: name.into(),
            partition_value: value,
            sort_key_prefix: None,
        }
    }

    pub fn with_sort_key_prefix(
        mut self,
        attribute: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.sort_key_prefix = Some(SortKeyPrefix {
            attribute: attribute.into(),
            prefix: prefix.into(),
        });
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Record>,
    /// Present when more pages remain.
    pub last_evaluated_key: Option<Record>,
}

/// A keyed partial update: every `set` entry is written, nothing else changes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub key: Record,
    pub set: Vec<(String, StoreValue)>,
}

/// Result of one batch delete call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchDeleteOutcome {
    /// Keys the table reported as not processed.
    pub unprocessed: usize,
}
