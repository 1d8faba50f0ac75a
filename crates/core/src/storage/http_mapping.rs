//! Pure functions for mapping store errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`StoreError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// Caller mistakes are reported as 400, failures of the underlying store as 500:
///
/// - `MissingField` -> 400 (Bad Request)
/// - `InvalidValue` -> 400 (Bad Request)
/// - `MalformedKey` -> 400 (Bad Request)
/// - `WriteFailed` -> 500 (Internal Server Error)
/// - `ReadFailed` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use inventory_core::storage::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::MissingField("pk".to_string());
/// assert_eq!(store_error_to_status_code(&error), 400);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::MissingField(_) => 400,
        StoreError::InvalidValue { .. } => 400,
        StoreError::MalformedKey(_) => 400,
        StoreError::WriteFailed(_) => 500,
        StoreError::ReadFailed(_) => 500,
    }
}
