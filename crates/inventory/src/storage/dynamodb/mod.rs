//! DynamoDB table backend.
//!
//! Implements `inventory_core::storage::ItemTable` with `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod expressions;
mod repository;

pub use repository::{create_client, DynamoDbTable};
