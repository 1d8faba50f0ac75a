//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `inventory_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use inventory_core::storage::StoreError;

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::WriteFailed("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::WriteFailed("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::WriteFailed("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::WriteFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::WriteFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::WriteFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::WriteFailed("Table not found".to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::WriteFailed("Throughput exceeded, please retry".to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::WriteFailed("Request limit exceeded, please retry".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::WriteFailed("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::WriteFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::WriteFailed(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(err: SdkError<QueryError, R>) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            StoreError::ReadFailed("Table not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::ReadFailed("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::ReadFailed("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::ReadFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::ReadFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a BatchWriteItem SDK error to StoreError.
pub fn map_batch_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<BatchWriteItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        BatchWriteItemError::ResourceNotFoundException(_) => {
            StoreError::WriteFailed("Table not found".to_string())
        }
        BatchWriteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::WriteFailed("Throughput exceeded, please retry".to_string())
        }
        BatchWriteItemError::RequestLimitExceeded(_) => {
            StoreError::WriteFailed("Request limit exceeded, please retry".to_string())
        }
        BatchWriteItemError::InternalServerError(_) => {
            StoreError::WriteFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::WriteFailed(format!("BatchWriteItem failed: {:?}", err)),
    }
}
