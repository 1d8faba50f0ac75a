//! Inbound request bodies.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Operation requested on the components endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Query,
    Put,
    Update,
    Delete,
}

impl Action {
    /// Whether the action changes stored data.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Query)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "put" => Ok(Self::Put),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Put => write!(f, "put"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// `{action, value}` body of the components endpoint.
///
/// The action stays a string so an unknown action can still be answered.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    pub value: Value,
}

impl ActionRequest {
    pub fn action(&self) -> Option<Action> {
        self.action.parse().ok()
    }
}

/// `{value}` body of the organization and registration endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRequest {
    pub value: Value,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parses a JSON request body.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    Ok(serde_json::from_slice(body)?)
}
