//! In-memory table implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inventory_core::storage::{
    BatchDeleteOutcome, ItemTable, KeyCondition, QueryPage, Record, Result, SortKey, StoreError,
    StoreValue, TableSchema, UpdateRequest,
};

/// Default number of records per query page.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Records are ordered by partition key text, then sort key text.
type RecordKey = (String, String);

/// In-memory table for tests and local runs.
///
/// Data is not persisted and will be lost when the table is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    name: String,
    partition_key: String,
    sort_key: Option<String>,
    page_size: usize,
    records: Arc<RwLock<BTreeMap<RecordKey, Record>>>,
}

impl InMemoryTable {
    /// Creates an empty table keyed the way `schema` describes.
    pub fn new(name: impl Into<String>, schema: &TableSchema) -> Self {
        Self {
            name: name.into(),
            partition_key: schema.partition_key().to_string(),
            sort_key: schema.sort_key().map(SortKey::name).map(str::to_string),
            page_size: DEFAULT_PAGE_SIZE,
            records: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Limits how many records one query page returns.
    #[cfg(test)]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of stored records.
    #[cfg(test)]
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    fn record_key(&self, record: &Record) -> Result<RecordKey> {
        let partition = record
            .get(&self.partition_key)
            .map(key_text)
            .ok_or_else(|| StoreError::MissingField(self.partition_key.clone()))?;
        let sort = match &self.sort_key {
            Some(name) => record
                .get(name)
                .map(key_text)
                .ok_or_else(|| StoreError::MissingField(name.clone()))?,
            None => String::new(),
        };
        Ok((partition, sort))
    }

    fn key_of(&self, record: &Record) -> Record {
        record
            .iter()
            .filter(|(name, _)| {
                **name == self.partition_key || Some(name.as_str()) == self.sort_key.as_deref()
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Text used to order and match key values.
fn key_text(value: &StoreValue) -> String {
    match value {
        StoreValue::S(s) | StoreValue::N(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

#[async_trait]
impl ItemTable for InMemoryTable {
    fn table_name(&self) -> &str {
        &self.name
    }

    async fn put_item(&self, record: Record) -> Result<()> {
        let key = self.record_key(&record)?;
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn update_item(&self, request: UpdateRequest) -> Result<()> {
        let key = self.record_key(&request.key)?;
        let mut records = self.records.write().await;
        let record = records.entry(key).or_insert(request.key);
        for (field, value) in request.set {
            record.insert(field, value);
        }
        Ok(())
    }

    async fn query_page(
        &self,
        condition: &KeyCondition,
        exclusive_start_key: Option<Record>,
    ) -> Result<QueryPage> {
        let partition = key_text(&condition.partition_value);
        let start_after = exclusive_start_key
            .as_ref()
            .map(|key| self.record_key(key))
            .transpose()?;

        let records = self.records.read().await;
        let mut matching = records
            .iter()
            .filter(|((record_partition, _), _)| *record_partition == partition)
            .filter(|((_, sort), _)| match &condition.sort_key_prefix {
                Some(prefix) => sort.starts_with(&prefix.prefix),
                None => true,
            })
            .filter(|(key, _)| start_after.as_ref().is_none_or(|start| *key > start))
            .map(|(_, record)| record);

        let items: Vec<Record> = matching.by_ref().take(self.page_size).cloned().collect();
        let last_evaluated_key = match (matching.next(), items.last()) {
            (Some(_), Some(last)) => Some(self.key_of(last)),
            _ => None,
        };

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_delete(&self, keys: Vec<Record>) -> Result<BatchDeleteOutcome> {
        let keys = keys
            .iter()
            .map(|key| self.record_key(key))
            .collect::<Result<Vec<_>>>()?;

        let mut records = self.records.write().await;
        for key in keys {
            records.remove(&key);
        }

        Ok(BatchDeleteOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use inventory_core::storage::{FieldType, Item, ItemStore};

    use super::*;

    fn schema() -> TableSchema {
        TableSchema::new(
            "organization_id",
            HashMap::from([
                ("organization_id".to_string(), FieldType::String),
                ("category".to_string(), FieldType::String),
                ("component_id".to_string(), FieldType::String),
                ("quantity".to_string(), FieldType::Number),
            ]),
        )
        .with_composite_sort_key("sk", "category", "component_id", "#")
    }

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    async fn seeded(page_size: usize) -> (ItemStore, InMemoryTable) {
        let table = InMemoryTable::new("components", &schema()).with_page_size(page_size);
        let store = ItemStore::new(Arc::new(table.clone()), schema());
        for (org, category) in [
            ("org-1", "bolt"),
            ("org-1", "bolt"),
            ("org-1", "bolts"),
            ("org-1", "nut"),
            ("org-2", "bolt"),
        ] {
            store
                .put(item(json!({"organization_id": org, "category": category, "quantity": 1})))
                .await
                .unwrap();
        }
        (store, table)
    }

    #[tokio::test]
    async fn test_query_pages_through_partition() {
        let (store, _) = seeded(1).await;

        let items = store
            .query_by_partition_key(&item(json!({"organization_id": "org-1"})))
            .await
            .unwrap();

        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_prefix_query_excludes_longer_prefixes() {
        let (store, _) = seeded(2).await;

        let items = store
            .query_by_sort_key_prefix(&item(json!({"organization_id": "org-1", "category": "bolt"})))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i["category"] == "bolt"));
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let (store, table) = seeded(10).await;
        let stored = store
            .query_by_sort_key_prefix(&item(json!({"organization_id": "org-1", "category": "nut"})))
            .await
            .unwrap();
        let sk = stored[0]["sk"].clone();

        store
            .update(item(json!({"organization_id": "org-1", "sk": sk.clone(), "quantity": 7})))
            .await
            .unwrap();
        let updated = store
            .query_by_sort_key_prefix(&item(json!({"organization_id": "org-1", "category": "nut"})))
            .await
            .unwrap();
        assert_eq!(updated[0]["quantity"], "7");

        let deleted = store
            .batch_delete(json!([{"organization_id": "org-1", "sk": sk}]))
            .await
            .unwrap();
        assert!(deleted);
        assert_eq!(table.record_count().await, 4);
    }
}
