//! User registration handler.
//!
//! A registration either creates a new organization, making the caller its
//! `admin`, or joins an existing one as a `viewer`. The user record links the
//! user to the organization by the organizations table's partition key.

use std::str::FromStr;

use axum::{body::Bytes, extract::State, response::Response};
use inventory_auth::VerifiedClaims;
use inventory_core::request::{parse_body, ValueRequest};
use inventory_core::response::Envelope;
use inventory_core::storage::Item;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{
    components::as_item, envelope_response, organization::accounts,
    organization::ORGANIZATION_NAME, ApiError,
};
use crate::state::{Accounts, AppState};

/// How the user gets an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    Create,
    Join,
}

impl RegistrationMode {
    /// Identity-provider group granted to the registered user.
    pub fn group(&self) -> &'static str {
        match self {
            Self::Create => "admin",
            Self::Join => "viewer",
        }
    }
}

impl FromStr for RegistrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "join" => Ok(Self::Join),
            other => Err(format!("unknown registration mode: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserPayload {
    user: Item,
}

/// POST /register - Register the caller and attach them to an organization.
pub async fn register_user(
    VerifiedClaims(_claims): VerifiedClaims,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let accounts = accounts(&state)?;
    let request: ValueRequest = parse_body(&body)?;
    let value = as_item(request.value)?;

    let users_pk = accounts.users.schema().partition_key();
    let orgs_pk = accounts.organizations.schema().partition_key();

    let mode: RegistrationMode = required(&value, "mode")?
        .parse()
        .map_err(ApiError::BadRequest)?;
    let organization_input = required(&value, "organization_input")?;
    let user_id = required(&value, users_pk)?;
    let username = required(&value, "username")?;

    let organization = match mode {
        RegistrationMode::Create => create_organization(accounts, organization_input).await?,
        RegistrationMode::Join => find_organization(accounts, organization_input).await?,
    };
    let organization_id = organization
        .get(orgs_pk)
        .cloned()
        .ok_or_else(|| ApiError::internal(format!("organization is missing {orgs_pk}")))?;

    let mut user = Item::new();
    user.insert(users_pk.to_string(), Value::String(user_id.to_string()));
    user.insert(orgs_pk.to_string(), organization_id.clone());
    user.insert("username".to_string(), Value::String(username.to_string()));
    let Some(stored_user) = accounts.users.put(user).await?.into_iter().next() else {
        return Err(ApiError::bad_request(format!("user {user_id} was not stored")));
    };

    accounts
        .directory
        .add_user_to_group(username, mode.group())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let mut response = Item::new();
    response.insert(
        users_pk.to_string(),
        stored_user.get(users_pk).cloned().unwrap_or(Value::Null),
    );
    response.insert(orgs_pk.to_string(), organization_id);
    response.insert(
        ORGANIZATION_NAME.to_string(),
        organization
            .get(ORGANIZATION_NAME)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    );
    response.insert(
        "username".to_string(),
        stored_user.get("username").cloned().unwrap_or(Value::Null),
    );

    envelope_response(&Envelope::success(UserPayload { user: response }))
}

async fn create_organization(accounts: &Accounts, name: &str) -> Result<Item, ApiError> {
    let mut organization = Item::new();
    organization.insert(
        accounts.organizations.schema().partition_key().to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    organization.insert(ORGANIZATION_NAME.to_string(), Value::String(name.to_string()));

    let stored = accounts.organizations.put(organization).await?;
    stored
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request(format!("organization {name} was not stored")))
}

async fn find_organization(accounts: &Accounts, organization_id: &str) -> Result<Item, ApiError> {
    let mut key = Item::new();
    key.insert(
        accounts.organizations.schema().partition_key().to_string(),
        Value::String(organization_id.to_string()),
    );

    let found = accounts.organizations.query_by_partition_key(&key).await?;
    found
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request(format!("organization {organization_id} not found")))
}

fn required<'a>(value: &'a Item, field: &str) -> Result<&'a str, ApiError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request(format!("missing {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_grants_group() {
        assert_eq!("create".parse::<RegistrationMode>().unwrap().group(), "admin");
        assert_eq!("join".parse::<RegistrationMode>().unwrap().group(), "viewer");
        assert!("invite".parse::<RegistrationMode>().is_err());
    }
}
