//! `/components` handlers.

use axum::{body::Bytes, extract::State, response::Response};
use inventory_auth::VerifiedClaims;
use inventory_core::auth::permits;
use inventory_core::request::{parse_body, Action, ActionRequest};
use inventory_core::response::{Components, Envelope, Outcome};
use inventory_core::storage::Item;
use serde_json::Value;

use super::{envelope_response, ApiError};
use crate::state::AppState;

/// Message returned when a caller without a privileged group tries to write.
pub const NO_EDIT_PERMISSION: &str = "no edit permission";

/// POST /components - Run one `{action, value}` request against the components table.
pub async fn handle_components(
    VerifiedClaims(claims): VerifiedClaims,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ActionRequest = parse_body(&body)?;

    let Some(action) = request.action() else {
        tracing::info!(action = %request.action, "Unsupported action");
        return envelope_response(&Envelope::failure("", Components::default()));
    };

    tracing::info!(action = %action, groups = ?claims.groups(), "Handling components request");

    if !permits(&claims, action) {
        tracing::warn!(action = %action, "Caller may not edit components");
        return envelope_response(&Envelope::failure(
            NO_EDIT_PERMISSION,
            Components::default(),
        ));
    }

    let store = &state.components;
    let (outcome, components) = match action {
        Action::Query => {
            let item = as_item(request.value)?;
            let prefix_requested = store
                .schema()
                .sort_key_prefix_field()
                .is_some_and(|field| item.contains_key(field));

            let items = if prefix_requested {
                store.query_by_sort_key_prefix(&item).await?
            } else {
                store.query_by_partition_key(&item).await?
            };
            (Outcome::Success, items)
        }
        Action::Put => {
            let items = store.put(as_item(request.value)?).await?;
            (Outcome::from(!items.is_empty()), items)
        }
        Action::Update => {
            let updated = store.update(as_item(request.value)?).await?;
            (Outcome::from(updated), Vec::new())
        }
        Action::Delete => {
            let deleted = store.batch_delete(request.value).await?;
            (Outcome::from(deleted), Vec::new())
        }
    };

    envelope_response(&Envelope::new(outcome, "", Components::new(components)))
}

/// Query, put and update take a single JSON object.
pub(super) fn as_item(value: Value) -> Result<Item, ApiError> {
    match value {
        Value::Object(item) => Ok(item),
        other => Err(ApiError::bad_request(format!(
            "value must be an object, got {other}"
        ))),
    }
}
