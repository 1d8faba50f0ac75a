use async_trait::async_trait;

use super::{BatchDeleteOutcome, KeyCondition, QueryPage, Record, Result, UpdateRequest};

/// Low-level access to one wide-column table.
///
/// Implementations do no validation of their own; [`ItemStore`](super::ItemStore)
/// builds every request from the table schema before it reaches this trait.
#[async_trait]
pub trait ItemTable: Send + Sync {
    /// Name of the backing table, for logging.
    fn table_name(&self) -> &str;

    /// Writes a whole record, replacing any record with the same key.
    async fn put_item(&self, record: Record) -> Result<()>;

    /// Sets the listed attributes on the record with the given key.
    async fn update_item(&self, request: UpdateRequest) -> Result<()>;

    /// Reads one page of records matching the condition.
    async fn query_page(
        &self,
        condition: &KeyCondition,
        exclusive_start_key: Option<Record>,
    ) -> Result<QueryPage>;

    /// Deletes up to [`BATCH_DELETE_CHUNK_SIZE`](super::BATCH_DELETE_CHUNK_SIZE) records.
    async fn batch_delete(&self, keys: Vec<Record>) -> Result<BatchDeleteOutcome>;
}
