//! Organization lookup handler.

use axum::{body::Bytes, extract::State, response::Response};
use inventory_auth::VerifiedClaims;
use inventory_core::request::{parse_body, ValueRequest};
use inventory_core::response::Envelope;
use inventory_core::storage::Item;
use serde::Serialize;
use serde_json::Value;

use super::{components::as_item, envelope_response, ApiError};
use crate::state::{Accounts, AppState};

/// Message returned when the caller has no user record yet.
pub const UNREGISTERED_USER: &str = "Unregistered user";

/// Attribute of an organization that holds its display name.
pub const ORGANIZATION_NAME: &str = "organization_name";

#[derive(Debug, Serialize)]
struct OrganizationPayload {
    organization: Item,
}

/// POST /organization - Look up the organization of a user.
pub async fn get_organization(
    VerifiedClaims(_claims): VerifiedClaims,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let accounts = accounts(&state)?;
    let request: ValueRequest = parse_body(&body)?;
    let value = as_item(request.value)?;

    let users_pk = accounts.users.schema().partition_key();
    let user_id = value
        .get(users_pk)
        .ok_or_else(|| ApiError::bad_request(format!("missing {users_pk}")))?;

    if user_id.as_str().is_some_and(str::is_empty) {
        return unregistered(accounts);
    }

    let users = accounts.users.query_by_partition_key(&value).await?;
    let Some(user) = users.first() else {
        tracing::info!(user = %user_id, "User not found");
        return unregistered(accounts);
    };

    let organizations = accounts.organizations.query_by_partition_key(user).await?;
    let Some(organization) = organizations.into_iter().next() else {
        return Err(ApiError::bad_request(format!(
            "organization of user {user_id} not found"
        )));
    };

    envelope_response(&Envelope::success(OrganizationPayload { organization }))
}

fn unregistered(accounts: &Accounts) -> Result<Response, ApiError> {
    let mut organization = Item::new();
    organization.insert(
        accounts.organizations.schema().partition_key().to_string(),
        Value::String(String::new()),
    );
    organization.insert(ORGANIZATION_NAME.to_string(), Value::String(String::new()));

    envelope_response(&Envelope::failure(
        UNREGISTERED_USER,
        OrganizationPayload { organization },
    ))
}

pub(super) fn accounts(state: &AppState) -> Result<&Accounts, ApiError> {
    state
        .accounts
        .as_ref()
        .ok_or_else(|| ApiError::internal("account tables are not configured"))
}
