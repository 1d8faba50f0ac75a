//! Composite sort key codec.
//!
//! Pure functions for composing and splitting `prefix<delimiter>suffix` sort keys.

use super::{Result, StoreError};

/// Encodes and decodes composite sort keys for one delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeyCodec {
    delimiter: String,
}

impl SortKeyCodec {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// An empty delimiter disables composition.
    pub fn is_composite(&self) -> bool {
        !self.delimiter.is_empty()
    }

    /// Pattern: `<prefix><delimiter><suffix>`
    pub fn encode(&self, prefix: &str, suffix: &str) -> String {
        format!("{prefix}{}{suffix}", self.delimiter)
    }

    /// Splits on the first occurrence of the delimiter.
    ///
    /// With an empty delimiter the value is returned untouched as the prefix.
    pub fn decode<'a>(&self, value: &'a str) -> Result<(&'a str, &'a str)> {
        if !self.is_composite() {
            return Ok((value, ""));
        }

        value
            .split_once(self.delimiter.as_str())
            .ok_or_else(|| StoreError::MalformedKey(value.to_string()))
    }

    /// Value for a `begins_with` condition matching every key under `prefix`.
    ///
    /// Pattern: `<prefix><delimiter>`
    ///
    /// The trailing delimiter keeps `bolt` from matching `bolts#...`.
    pub fn begins_with(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.delimiter)
    }
}
