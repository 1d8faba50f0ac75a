//! Schema-driven item storage.
//!
//! Pure pieces (schema, key codec, value conversions, error mapping) live beside the
//! [`ItemStore`] engine, which reaches the outside world only through [`ItemTable`].

mod conversions;
mod error;
mod http_mapping;
mod item_store;
mod keys;
mod payload;
mod schema;
mod timestamp;
mod traits;
mod types;

pub use conversions::{infer_store_value, record_to_item, to_plain_value, to_store_value};
pub use error::{Result, SchemaError, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use item_store::{ItemStore, BATCH_DELETE_CHUNK_SIZE};
pub use keys::SortKeyCodec;
pub use payload::normalize_delete_payload;
pub use schema::{FieldType, FieldTypes, SortKey, TableSchema};
pub use timestamp::{
    format_timestamp, Clock, FixedClock, SystemClock, CREATED_AT, TIMESTAMP_FORMAT, UPDATED_AT,
};
pub use traits::ItemTable;
pub use types::{
    BatchDeleteOutcome, Item, KeyCondition, QueryPage, Record, SortKeyPrefix, StoreValue,
    UpdateRequest,
};
