//! DynamoDB table implementation.
//!
//! Implements [`ItemTable`] from `inventory_core::storage` over one DynamoDB table.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{DeleteRequest, WriteRequest};
use aws_sdk_dynamodb::Client;

use inventory_core::storage::{
    BatchDeleteOutcome, ItemTable, KeyCondition, QueryPage, Record, Result, StoreError,
    UpdateRequest,
};

use super::conversions::{attributes_to_record, record_to_attributes};
use super::error::{
    map_batch_write_error, map_put_item_error, map_query_error, map_update_item_error,
};
use super::expressions::{key_condition_expression, update_expression};

/// Creates a DynamoDB client for `region`, optionally pointed at a local endpoint.
pub async fn create_client(region: &str, endpoint_url: Option<&str>) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// One DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoDbTable {
    client: Client,
    table_name: String,
}

impl DynamoDbTable {
    /// Creates a new table handle with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl ItemTable for DynamoDbTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn put_item(&self, record: Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_attributes(&record)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn update_item(&self, request: UpdateRequest) -> Result<()> {
        let expression = update_expression(&request.set);

        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(record_to_attributes(&request.key)))
            .update_expression(expression.expression)
            .set_expression_attribute_names(Some(expression.names))
            .set_expression_attribute_values(Some(expression.values))
            .send()
            .await
            .map_err(map_update_item_error)?;

        Ok(())
    }

    async fn query_page(
        &self,
        condition: &KeyCondition,
        exclusive_start_key: Option<Record>,
    ) -> Result<QueryPage> {
        let expression = key_condition_expression(condition);

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(expression.expression)
            .set_expression_attribute_names(Some(expression.names))
            .set_expression_attribute_values(Some(expression.values))
            .set_exclusive_start_key(exclusive_start_key.as_ref().map(record_to_attributes))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(attributes_to_record)
            .collect::<Result<Vec<_>>>()?;
        let last_evaluated_key = result
            .last_evaluated_key
            .filter(|key| !key.is_empty())
            .map(|key| attributes_to_record(&key))
            .transpose()?;

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_delete(&self, keys: Vec<Record>) -> Result<BatchDeleteOutcome> {
        let write_requests = keys
            .iter()
            .map(|key| {
                DeleteRequest::builder()
                    .set_key(Some(record_to_attributes(key)))
                    .build()
                    .map(|delete| WriteRequest::builder().delete_request(delete).build())
                    .map_err(|e| StoreError::WriteFailed(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let result = self
            .client
            .batch_write_item()
            .request_items(&self.table_name, write_requests)
            .send()
            .await
            .map_err(map_batch_write_error)?;

        let unprocessed = result
            .unprocessed_items
            .as_ref()
            .and_then(|tables| tables.get(&self.table_name))
            .map_or(0, Vec::len);

        Ok(BatchDeleteOutcome { unprocessed })
    }
}
