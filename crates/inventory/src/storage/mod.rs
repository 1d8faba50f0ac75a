//! Table backends.
//!
//! Implementations of `inventory_core::storage::ItemTable`.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! The in-memory backend is always available and is selected at runtime with
//! `STORE_BACKEND=memory`.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{create_client, DynamoDbTable};
pub use inmemory::InMemoryTable;
