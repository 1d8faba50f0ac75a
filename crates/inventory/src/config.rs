use std::env;

use inventory_auth::{AuthConfig, AuthError};
use inventory_core::storage::{FieldTypes, SchemaError, TableSchema};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Where records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

/// A table name with its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub schema: TableSchema,
}

/// The two tables behind organization lookup and user registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTables {
    pub users: TableConfig,
    pub organizations: TableConfig,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub components: TableConfig,
    /// Present when `USERS_TABLE_NAME` is set.
    pub accounts: Option<AccountTables>,
    pub backend: StoreBackend,
    /// Local DynamoDB endpoint (e.g. `http://localhost:8000`).
    pub dynamodb_endpoint_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REGION_NAME`, `COGNITO_USER_POOL_ID`, `COGNITO_APP_CLIENT_ID`, `JWKS_CACHE_TTL_SECONDS` - see [`AuthConfig`]
    /// - `TABLE_NAME`, `PK_NAME`, `FIELD_TYPES` - components table (required)
    /// - `SK_NAME`, `SK_PREFIX`, `SK_SUFFIX`, `SK_DELIMITER` - components sort key layout (default: none)
    /// - `USERS_TABLE_NAME`, `USERS_PK_NAME`, `USERS_FIELD_TYPES` - users table (optional)
    /// - `ORGANIZATIONS_TABLE_NAME`, `ORGANIZATIONS_PK_NAME`, `ORGANIZATIONS_FIELD_TYPES` - organizations table (required with the users table)
    /// - `STORE_BACKEND` - `dynamodb` or `memory` (default: `dynamodb`)
    /// - `DYNAMODB_ENDPOINT_URL` - local DynamoDB endpoint (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let components = TableConfig {
            table_name: vars.required("TABLE_NAME")?,
            schema: TableSchema::from_layout(
                &vars.required("PK_NAME")?,
                &vars.optional("SK_NAME"),
                &vars.optional("SK_PREFIX"),
                &vars.optional("SK_SUFFIX"),
                &vars.optional("SK_DELIMITER"),
                vars.field_types("FIELD_TYPES")?,
            )?,
        };

        let accounts = match vars.get("USERS_TABLE_NAME") {
            Some(users_table) => Some(AccountTables {
                users: TableConfig {
                    table_name: users_table,
                    schema: TableSchema::new(
                        vars.required("USERS_PK_NAME")?,
                        vars.field_types("USERS_FIELD_TYPES")?,
                    ),
                },
                organizations: TableConfig {
                    table_name: vars.required("ORGANIZATIONS_TABLE_NAME")?,
                    schema: TableSchema::new(
                        vars.required("ORGANIZATIONS_PK_NAME")?,
                        vars.field_types("ORGANIZATIONS_FIELD_TYPES")?,
                    ),
                },
            }),
            None => None,
        };

        let backend = match vars.get("STORE_BACKEND").as_deref() {
            None | Some("dynamodb") => StoreBackend::DynamoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    reason: format!("expected dynamodb or memory, got {other}"),
                })
            }
        };

        Ok(Self {
            auth: AuthConfig::from_lookup(&lookup)?,
            components,
            accounts,
            backend,
            dynamodb_endpoint_url: vars.get("DYNAMODB_ENDPOINT_URL"),
        })
    }
}

/// Variable lookup where empty values count as unset.
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&'static str) -> Option<String>,
{
    fn get(&self, name: &'static str) -> Option<String> {
        (self.0)(name).filter(|value| !value.is_empty())
    }

    fn optional(&self, name: &'static str) -> String {
        self.get(name).unwrap_or_default()
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn field_types(&self, name: &'static str) -> Result<FieldTypes, ConfigError> {
        serde_json::from_str(&self.required(name)?).map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
    }
}
