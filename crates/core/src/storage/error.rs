use thiserror::Error;

use super::FieldType;

/// Errors raised while building a [`TableSchema`](super::TableSchema).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Partition key name must not be empty")]
    EmptyPartitionKey,
    #[error("Composite sort key requires a {0} field name")]
    IncompleteSortKey(&'static str),
}

/// Errors that can occur during item store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Field {field} does not hold a valid {expected} value")]
    InvalidValue { field: String, expected: FieldType },
    #[error("Malformed sort key: {0}")]
    MalformedKey(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Read failed: {0}")]
    ReadFailed(String),
}

/// Result type for item store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
