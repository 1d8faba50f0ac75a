//! Generic item store.
//!
//! [`ItemStore`] turns caller items into typed records according to a
//! [`TableSchema`] and drives an [`ItemTable`] with them.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::conversions::{record_to_item, to_store_value};
use super::payload::normalize_delete_payload;
use super::timestamp::{format_timestamp, Clock, SystemClock, CREATED_AT, UPDATED_AT};
use super::{
    FieldType, Item, ItemTable, KeyCondition, Record, Result, SortKey, StoreError, StoreValue,
    TableSchema, UpdateRequest,
};

/// Maximum number of keys in one batch delete call.
pub const BATCH_DELETE_CHUNK_SIZE: usize = 25;

/// Schema-driven CRUD over one table.
#[derive(Clone)]
pub struct ItemStore {
    table: Arc<dyn ItemTable>,
    schema: Arc<TableSchema>,
    clock: Arc<dyn Clock>,
}

impl ItemStore {
    pub fn new(table: Arc<dyn ItemTable>, schema: TableSchema) -> Self {
        Self {
            table,
            schema: Arc::new(schema),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for `created_at`/`updated_at`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn table_name(&self) -> &str {
        self.table.table_name()
    }

    /// Creates an item and returns it, enriched with generated attributes.
    ///
    /// With a composite sort key a fresh identifier is generated on every call and
    /// any caller-supplied sort key or identifier is overwritten.
    pub async fn put(&self, mut item: Item) -> Result<Vec<Item>> {
        let partition_key = self.schema.partition_key();
        let mut record = Record::new();
        record.insert(
            partition_key.to_string(),
            self.key_value(&item, partition_key, self.schema.key_type(partition_key))?,
        );

        let mut generated = vec![partition_key, CREATED_AT, UPDATED_AT];
        match self.schema.sort_key() {
            None => {}
            Some(SortKey::Plain { name }) => {
                record.insert(
                    name.clone(),
                    self.key_value(&item, name, self.schema.key_type(name))?,
                );
                generated.push(name.as_str());
            }
            Some(SortKey::Composite {
                name,
                prefix_field,
                suffix_field,
                codec,
            }) => {
                let prefix = item
                    .get(prefix_field)
                    .and_then(prefix_text)
                    .ok_or_else(|| StoreError::MissingField(prefix_field.clone()))?;
                let id = Uuid::new_v4().to_string();
                let sort_value = codec.encode(&prefix, &id);

                item.insert(name.clone(), Value::String(sort_value.clone()));
                item.insert(suffix_field.clone(), Value::String(id.clone()));
                record.insert(name.clone(), StoreValue::S(sort_value));
                record.insert(suffix_field.clone(), StoreValue::S(id));
                generated.push(name.as_str());
                generated.push(suffix_field.as_str());
            }
        }

        let timestamp = format_timestamp(self.clock.now());
        item.insert(CREATED_AT.to_string(), Value::String(timestamp.clone()));
        item.insert(UPDATED_AT.to_string(), Value::String(timestamp.clone()));
        record.insert(CREATED_AT.to_string(), StoreValue::S(timestamp.clone()));
        record.insert(UPDATED_AT.to_string(), StoreValue::S(timestamp));

        for (field, field_type) in self.schema.field_types() {
            if generated.contains(&field.as_str()) {
                continue;
            }
            if let Some(value) = item.get(field) {
                record.insert(field.clone(), to_store_value(field, value, *field_type)?);
            }
        }

        tracing::debug!(table = %self.table_name(), attributes = record.len(), "Putting item");
        self.table.put_item(record).await?;
        tracing::info!(table = %self.table_name(), "Put item");

        Ok(vec![item])
    }

    /// Patches the declared attributes of an existing item.
    ///
    /// Key attributes and timestamps in the patch are never written; `updated_at`
    /// is always refreshed. Attributes without a declared type are ignored.
    pub async fn update(&self, mut item: Item) -> Result<bool> {
        let partition_key = self.schema.partition_key();
        let mut key = Record::new();
        let value = item
            .remove(partition_key)
            .ok_or_else(|| StoreError::MissingField(partition_key.to_string()))?;
        key.insert(
            partition_key.to_string(),
            to_store_value(partition_key, &value, self.schema.key_type(partition_key))?,
        );

        if let Some(sort_key) = self.schema.sort_key() {
            let name = sort_key.name();
            let value = item
                .remove(name)
                .ok_or_else(|| StoreError::MissingField(name.to_string()))?;
            key.insert(
                name.to_string(),
                to_store_value(name, &value, self.sort_key_type(sort_key))?,
            );
            if let SortKey::Composite { suffix_field, .. } = sort_key {
                item.remove(suffix_field);
            }
        }

        item.remove(CREATED_AT);
        item.remove(UPDATED_AT);

        let mut set = vec![(
            UPDATED_AT.to_string(),
            StoreValue::S(format_timestamp(self.clock.now())),
        )];
        for (field, value) in &item {
            match self.schema.field_type(field) {
                Some(field_type) => {
                    set.push((field.clone(), to_store_value(field, value, field_type)?));
                }
                None => tracing::debug!(field = %field, "Ignoring undeclared field in update"),
            }
        }

        tracing::debug!(table = %self.table_name(), attributes = set.len(), "Updating item");
        self.table.update_item(UpdateRequest { key, set }).await?;
        tracing::info!(table = %self.table_name(), "Updated item");

        Ok(true)
    }

    /// Returns every item sharing the partition key value of `item`.
    pub async fn query_by_partition_key(&self, item: &Item) -> Result<Vec<Item>> {
        let condition = self.partition_condition(item)?;
        self.query_all(condition).await
    }

    /// Returns every item under the partition key whose sort key starts with the
    /// prefix field value of `item`.
    ///
    /// Tables without a composite sort key have no prefix to match, so this is a
    /// plain partition query for them.
    pub async fn query_by_sort_key_prefix(&self, item: &Item) -> Result<Vec<Item>> {
        let Some(SortKey::Composite {
            name,
            prefix_field,
            codec,
            ..
        }) = self.schema.sort_key()
        else {
            return self.query_by_partition_key(item).await;
        };

        let prefix = item
            .get(prefix_field)
            .and_then(prefix_text)
            .ok_or_else(|| StoreError::MissingField(prefix_field.clone()))?;
        let condition = self
            .partition_condition(item)?
            .with_sort_key_prefix(name.clone(), codec.begins_with(&prefix));

        self.query_all(condition).await
    }

    /// Deletes the keyed items described by `payload`.
    ///
    /// Every entry is validated before the first request. Chunks are sent one at a
    /// time; the first chunk that fails or leaves keys unprocessed ends the call with
    /// `false`, and chunks already deleted stay deleted.
    pub async fn batch_delete(&self, payload: Value) -> Result<bool> {
        let keys = normalize_delete_payload(payload)
            .iter()
            .map(|entry| self.delete_key(entry))
            .collect::<Result<Vec<_>>>()?;

        if keys.is_empty() {
            return Ok(true);
        }

        tracing::debug!(table = %self.table_name(), count = keys.len(), "Deleting items");
        for (chunk_index, chunk) in keys.chunks(BATCH_DELETE_CHUNK_SIZE).enumerate() {
            match self.table.batch_delete(chunk.to_vec()).await {
                Ok(outcome) if outcome.unprocessed > 0 => {
                    tracing::error!(
                        table = %self.table_name(),
                        chunk = chunk_index,
                        unprocessed = outcome.unprocessed,
                        "Batch delete left items unprocessed"
                    );
                    return Ok(false);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(
                        table = %self.table_name(),
                        chunk = chunk_index,
                        error = %e,
                        "Batch delete failed"
                    );
                    return Ok(false);
                }
            }
        }
        tracing::info!(table = %self.table_name(), count = keys.len(), "Deleted items");

        Ok(true)
    }

    async fn query_all(&self, condition: KeyCondition) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let page = self.table.query_page(&condition, start_key.take()).await?;
            tracing::debug!(table = %self.table_name(), count = page.items.len(), "Fetched query page");
            items.extend(page.items.iter().map(record_to_item));

            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        tracing::info!(table = %self.table_name(), count = items.len(), "Queried items");
        Ok(items)
    }

    fn partition_condition(&self, item: &Item) -> Result<KeyCondition> {
        let partition_key = self.schema.partition_key();
        let value = self.key_value(item, partition_key, self.schema.key_type(partition_key))?;
        Ok(KeyCondition::partition(partition_key, value))
    }

    fn delete_key(&self, entry: &Value) -> Result<Record> {
        let partition_key = self.schema.partition_key();
        let item = entry
            .as_object()
            .ok_or_else(|| StoreError::MissingField(partition_key.to_string()))?;

        let mut key = Record::new();
        key.insert(
            partition_key.to_string(),
            self.key_value(item, partition_key, self.schema.key_type(partition_key))?,
        );
        if let Some(sort_key) = self.schema.sort_key() {
            let name = sort_key.name();
            key.insert(
                name.to_string(),
                self.key_value(item, name, self.sort_key_type(sort_key))?,
            );
        }

        Ok(key)
    }

    /// Composite sort keys are always stored as strings.
    fn sort_key_type(&self, sort_key: &SortKey) -> FieldType {
        match sort_key {
            SortKey::Plain { name } => self.schema.key_type(name),
            SortKey::Composite { .. } => FieldType::String,
        }
    }

    fn key_value(&self, item: &Item, name: &str, field_type: FieldType) -> Result<StoreValue> {
        let value = item
            .get(name)
            .ok_or_else(|| StoreError::MissingField(name.to_string()))?;
        to_store_value(name, value, field_type)
    }
}

/// Text form of a sort key prefix value.
fn prefix_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::storage::timestamp::FixedClock;
    use crate::storage::{BatchDeleteOutcome, FieldTypes, QueryPage};

    /// Table double that records every call and replays scripted responses.
    #[derive(Default)]
    struct FakeTable {
        puts: Mutex<Vec<Record>>,
        updates: Mutex<Vec<UpdateRequest>>,
        queries: Mutex<Vec<(KeyCondition, Option<Record>)>>,
        pages: Mutex<VecDeque<QueryPage>>,
        deletes: Mutex<Vec<Vec<Record>>>,
        delete_results: Mutex<VecDeque<Result<BatchDeleteOutcome>>>,
        fail_writes: bool,
    }

    impl FakeTable {
        fn with_pages(pages: Vec<QueryPage>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                ..Self::default()
            }
        }

        fn with_delete_results(results: Vec<Result<BatchDeleteOutcome>>) -> Self {
            Self {
                delete_results: Mutex::new(results.into()),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ItemTable for FakeTable {
        fn table_name(&self) -> &str {
            "components"
        }

        async fn put_item(&self, record: Record) -> Result<()> {
            if self.fail_writes {
                return Err(StoreError::WriteFailed("unavailable".to_string()));
            }
            self.puts.lock().unwrap().push(record);
            Ok(())
        }

        async fn update_item(&self, request: UpdateRequest) -> Result<()> {
            self.updates.lock().unwrap().push(request);
            Ok(())
        }

        async fn query_page(
            &self,
            condition: &KeyCondition,
            exclusive_start_key: Option<Record>,
        ) -> Result<QueryPage> {
            self.queries
                .lock()
                .unwrap()
                .push((condition.clone(), exclusive_start_key));
            Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn batch_delete(&self, keys: Vec<Record>) -> Result<BatchDeleteOutcome> {
            self.deletes.lock().unwrap().push(keys);
            self.delete_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(BatchDeleteOutcome::default()))
        }
    }

    fn field_types() -> FieldTypes {
        HashMap::from([
            ("organization_id".to_string(), FieldType::String),
            ("category".to_string(), FieldType::String),
            ("component_id".to_string(), FieldType::String),
            ("name".to_string(), FieldType::String),
            ("quantity".to_string(), FieldType::Number),
        ])
    }

    fn composite_schema() -> TableSchema {
        TableSchema::new("organization_id", field_types()).with_composite_sort_key(
            "sk",
            "category",
            "component_id",
            "#",
        )
    }

    fn store(table: Arc<FakeTable>, schema: TableSchema) -> ItemStore {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 1, 2, 3).unwrap();
        ItemStore::new(table, schema).with_clock(Arc::new(FixedClock(instant)))
    }

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn record(id: &str) -> Record {
        Record::from([
            ("organization_id".to_string(), StoreValue::S("org-1".to_string())),
            ("sk".to_string(), StoreValue::S(format!("bolt#{id}"))),
        ])
    }

    fn key_entries(count: usize) -> Value {
        Value::Array(
            (0..count)
                .map(|i| json!({"organization_id": "org-1", "sk": format!("bolt#{i}")}))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_put_generates_composite_sort_key() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let stored = store
            .put(item(json!({
                "organization_id": "org-1",
                "category": "bolt",
                "component_id": "caller-supplied",
                "quantity": 12,
            })))
            .await
            .unwrap();

        assert_eq!(stored.len(), 1);
        let id = stored[0]["component_id"].as_str().unwrap();
        assert_ne!(id, "caller-supplied");
        assert_eq!(stored[0]["sk"], json!(format!("bolt#{id}")));

        let puts = table.puts.lock().unwrap();
        assert_eq!(puts[0]["sk"], StoreValue::S(format!("bolt#{id}")));
        assert_eq!(puts[0]["component_id"], StoreValue::S(id.to_string()));
        assert_eq!(puts[0]["quantity"], StoreValue::N("12".to_string()));
    }

    #[tokio::test]
    async fn test_put_sets_equal_timestamps() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let stored = store
            .put(item(json!({
                "organization_id": "org-1",
                "category": "bolt",
                "created_at": "1999/01/01 00:00:00",
            })))
            .await
            .unwrap();

        assert_eq!(stored[0][CREATED_AT], json!("2024/03/09 10:02:03"));
        assert_eq!(stored[0][CREATED_AT], stored[0][UPDATED_AT]);

        let puts = table.puts.lock().unwrap();
        assert_eq!(puts[0][CREATED_AT], puts[0][UPDATED_AT]);
    }

    #[tokio::test]
    async fn test_put_generates_unique_ids() {
        let table = Arc::new(FakeTable::default());
        let store = store(table, composite_schema());

        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let stored = store
                .put(item(json!({"organization_id": "org-1", "category": "bolt"})))
                .await
                .unwrap();
            ids.insert(stored[0]["component_id"].as_str().unwrap().to_string());
        }

        assert_eq!(ids.len(), 1000);
    }

    #[tokio::test]
    async fn test_put_without_sort_key_adds_no_sort_attributes() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), TableSchema::new("organization_id", field_types()));

        let stored = store
            .put(item(json!({"organization_id": "org-1", "name": "Acme", "extra": true})))
            .await
            .unwrap();

        assert!(!stored[0].contains_key("sk"));
        assert!(!stored[0].contains_key("component_id"));

        let puts = table.puts.lock().unwrap();
        let attributes: Vec<&str> = puts[0].keys().map(String::as_str).collect();
        assert_eq!(
            attributes,
            vec!["created_at", "name", "organization_id", "updated_at"]
        );
    }

    #[tokio::test]
    async fn test_put_with_plain_sort_key_copies_caller_value() {
        let table = Arc::new(FakeTable::default());
        let schema = TableSchema::new("organization_id", field_types()).with_plain_sort_key("name");
        let store = store(table.clone(), schema);

        store
            .put(item(json!({"organization_id": "org-1", "name": "washer"})))
            .await
            .unwrap();

        let puts = table.puts.lock().unwrap();
        assert_eq!(puts[0]["name"], StoreValue::S("washer".to_string()));
    }

    #[tokio::test]
    async fn test_put_requires_key_fields() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let missing_partition = store.put(item(json!({"category": "bolt"}))).await;
        assert_eq!(
            missing_partition,
            Err(StoreError::MissingField("organization_id".to_string()))
        );

        let missing_prefix = store.put(item(json!({"organization_id": "org-1"}))).await;
        assert_eq!(
            missing_prefix,
            Err(StoreError::MissingField("category".to_string()))
        );

        let plain = ItemStore::new(
            table.clone(),
            TableSchema::new("organization_id", field_types()).with_plain_sort_key("name"),
        );
        let missing_sort = plain.put(item(json!({"organization_id": "org-1"}))).await;
        assert_eq!(
            missing_sort,
            Err(StoreError::MissingField("name".to_string()))
        );

        assert!(table.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_rejects_value_of_wrong_type() {
        let table = Arc::new(FakeTable::default());
        let store = store(table, composite_schema());

        let result = store
            .put(item(json!({
                "organization_id": "org-1",
                "category": "bolt",
                "quantity": "a dozen",
            })))
            .await;

        assert!(matches!(result, Err(StoreError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_put_propagates_write_failure() {
        let store = store(Arc::new(FakeTable::failing()), composite_schema());

        let result = store
            .put(item(json!({"organization_id": "org-1", "category": "bolt"})))
            .await;

        assert_eq!(
            result,
            Err(StoreError::WriteFailed("unavailable".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_never_patches_keys() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let updated = store
            .update(item(json!({
                "organization_id": "org-1",
                "sk": "bolt#1",
                "component_id": "2",
                "quantity": 30,
                "created_at": "1999/01/01 00:00:00",
                "undeclared": "ignored",
            })))
            .await
            .unwrap();
        assert!(updated);

        let updates = table.updates.lock().unwrap();
        assert_eq!(updates[0].key, record("1"));
        assert_eq!(
            updates[0].set,
            vec![
                (
                    UPDATED_AT.to_string(),
                    StoreValue::S("2024/03/09 10:02:03".to_string())
                ),
                ("quantity".to_string(), StoreValue::N("30".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_with_only_keys_still_writes_updated_at() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        store
            .update(item(json!({"organization_id": "org-1", "sk": "bolt#1"})))
            .await
            .unwrap();

        let updates = table.updates.lock().unwrap();
        assert_eq!(updates[0].set.len(), 1);
        assert_eq!(updates[0].set[0].0, UPDATED_AT);
    }

    #[tokio::test]
    async fn test_update_requires_sort_key() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let result = store
            .update(item(json!({"organization_id": "org-1", "quantity": 1})))
            .await;

        assert_eq!(result, Err(StoreError::MissingField("sk".to_string())));
        assert!(table.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_follows_every_page() {
        let pages = vec![
            QueryPage {
                items: vec![record("1"), record("2")],
                last_evaluated_key: Some(record("2")),
            },
            QueryPage {
                items: vec![record("3"), record("4")],
                last_evaluated_key: Some(record("4")),
            },
            QueryPage {
                items: vec![record("5")],
                last_evaluated_key: None,
            },
        ];
        let table = Arc::new(FakeTable::with_pages(pages));
        let store = store(table.clone(), composite_schema());

        let items = store
            .query_by_partition_key(&item(json!({"organization_id": "org-1"})))
            .await
            .unwrap();

        let sort_keys: HashSet<&str> = items.iter().filter_map(|i| i["sk"].as_str()).collect();
        assert_eq!(items.len(), 5);
        assert_eq!(sort_keys.len(), 5);

        let queries = table.queries.lock().unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].1, None);
        assert_eq!(queries[1].1, Some(record("2")));
        assert_eq!(queries[2].1, Some(record("4")));
    }

    #[tokio::test]
    async fn test_query_requires_partition_key() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let result = store.query_by_partition_key(&item(json!({}))).await;

        assert_eq!(
            result,
            Err(StoreError::MissingField("organization_id".to_string()))
        );
        assert!(table.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prefix_query_matches_prefix_and_delimiter() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        store
            .query_by_sort_key_prefix(&item(json!({"organization_id": "org-1", "category": "bolt"})))
            .await
            .unwrap();

        let queries = table.queries.lock().unwrap();
        let condition = &queries[0].0;
        assert_eq!(
            condition.partition_value,
            StoreValue::S("org-1".to_string())
        );
        let prefix = condition.sort_key_prefix.as_ref().unwrap();
        assert_eq!(prefix.attribute, "sk");
        assert_eq!(prefix.prefix, "bolt#");
    }

    #[tokio::test]
    async fn test_prefix_query_without_composite_key_queries_partition() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), TableSchema::new("organization_id", field_types()));

        store
            .query_by_sort_key_prefix(&item(json!({"organization_id": "org-1", "category": "bolt"})))
            .await
            .unwrap();

        let queries = table.queries.lock().unwrap();
        assert!(queries[0].0.sort_key_prefix.is_none());
    }

    #[tokio::test]
    async fn test_batch_delete_chunks_by_25() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        assert!(store.batch_delete(key_entries(26)).await.unwrap());

        let deletes = table.deletes.lock().unwrap();
        let sizes: Vec<usize> = deletes.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![25, 1]);
    }

    #[tokio::test]
    async fn test_batch_delete_of_nothing_makes_no_calls() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        assert!(store.batch_delete(json!([])).await.unwrap());
        assert!(table.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_stops_at_unprocessed_chunk() {
        let table = Arc::new(FakeTable::with_delete_results(vec![Ok(
            BatchDeleteOutcome { unprocessed: 3 },
        )]));
        let store = store(table.clone(), composite_schema());

        assert!(!store.batch_delete(key_entries(60)).await.unwrap());
        assert_eq!(table.deletes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_delete_stops_at_failed_chunk() {
        let table = Arc::new(FakeTable::with_delete_results(vec![
            Ok(BatchDeleteOutcome::default()),
            Err(StoreError::WriteFailed("throttled".to_string())),
        ]));
        let store = store(table.clone(), composite_schema());

        assert!(!store.batch_delete(key_entries(60)).await.unwrap());
        assert_eq!(table.deletes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_delete_validates_before_deleting() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let mut entries = key_entries(30);
        if let Value::Array(list) = &mut entries {
            list.push(json!({"organization_id": "org-1"}));
        }

        let result = store.batch_delete(entries).await;

        assert_eq!(result, Err(StoreError::MissingField("sk".to_string())));
        assert!(table.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_accepts_encoded_text() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let payload = json!(r#"[{"organization_id": "org-1", "sk": "bolt#1"}]"#);
        assert!(store.batch_delete(payload).await.unwrap());

        let deletes = table.deletes.lock().unwrap();
        assert_eq!(deletes[0], vec![record("1")]);
    }

    #[tokio::test]
    async fn test_batch_delete_unparseable_text_is_one_invalid_entry() {
        let table = Arc::new(FakeTable::default());
        let store = store(table.clone(), composite_schema());

        let result = store.batch_delete(json!("org-1 bolt#1")).await;

        assert_eq!(
            result,
            Err(StoreError::MissingField("organization_id".to_string()))
        );
        assert!(table.deletes.lock().unwrap().is_empty());
    }
}
