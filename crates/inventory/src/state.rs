//! Application state.
//!
//! Holds one [`ItemStore`] per configured table, the optional account stores used by
//! organization lookup and registration, and the token verifier.

use std::sync::Arc;

use axum::extract::FromRef;
use inventory_auth::{AuthState, CachedKeySource, CognitoGroupDirectory, HttpKeySource, JwtVerifier};
use inventory_core::auth::{GroupDirectory, TokenVerifier};
use inventory_core::storage::{ItemStore, ItemTable};

use crate::config::{Config, StoreBackend, TableConfig};
use crate::storage::InMemoryTable;

/// Stores and directory behind `/organization` and `/register`.
#[derive(Clone)]
pub struct Accounts {
    pub users: ItemStore,
    pub organizations: ItemStore,
    pub directory: Arc<dyn GroupDirectory>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub components: ItemStore,
    /// `None` when the account tables are not configured.
    pub accounts: Option<Accounts>,
    pub auth: AuthState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    pub fn new(components: ItemStore, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            components,
            accounts: None,
            auth: AuthState::new(verifier),
        }
    }

    pub fn with_accounts(mut self, accounts: Accounts) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Builds the state described by `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let tables = TableFactory::new(config).await?;

        let state = Self::new(
            tables.store(&config.components),
            verifier_from_config(config),
        );

        let Some(account_tables) = &config.accounts else {
            tracing::info!("Account tables not configured, organization and register routes disabled");
            return Ok(state);
        };

        let directory = CognitoGroupDirectory::from_config(&config.auth).await;
        Ok(state.with_accounts(Accounts {
            users: tables.store(&account_tables.users),
            organizations: tables.store(&account_tables.organizations),
            directory: Arc::new(directory),
        }))
    }
}

fn verifier_from_config(config: &Config) -> Arc<dyn TokenVerifier> {
    let keys = HttpKeySource::new(config.auth.jwks_url());
    tracing::info!(url = %keys.url(), "Verifying tokens against published keys");

    match config.auth.jwks_cache_ttl {
        Some(ttl) => {
            tracing::info!(ttl_secs = ttl.as_secs(), "Caching signing keys");
            Arc::new(JwtVerifier::new(CachedKeySource::new(keys, ttl), &config.auth))
        }
        None => Arc::new(JwtVerifier::new(keys, &config.auth)),
    }
}

/// Creates tables on the configured backend.
enum TableFactory {
    Memory,
    #[cfg(feature = "dynamodb")]
    DynamoDb(aws_sdk_dynamodb::Client),
}

impl TableFactory {
    async fn new(config: &Config) -> anyhow::Result<Self> {
        match config.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on restart");
                Ok(Self::Memory)
            }
            #[cfg(feature = "dynamodb")]
            StoreBackend::DynamoDb => {
                let client = crate::storage::create_client(
                    &config.auth.region,
                    config.dynamodb_endpoint_url.as_deref(),
                )
                .await;
                Ok(Self::DynamoDb(client))
            }
            #[cfg(not(feature = "dynamodb"))]
            StoreBackend::DynamoDb => {
                anyhow::bail!("STORE_BACKEND=dynamodb requires the 'dynamodb' feature")
            }
        }
    }

    fn store(&self, table: &TableConfig) -> ItemStore {
        let backend: Arc<dyn ItemTable> = match self {
            Self::Memory => Arc::new(InMemoryTable::new(&table.table_name, &table.schema)),
            #[cfg(feature = "dynamodb")]
            Self::DynamoDb(client) => Arc::new(crate::storage::DynamoDbTable::new(
                client.clone(),
                &table.table_name,
            )),
        };
        tracing::debug!(table = %table.table_name, "Opened table");

        ItemStore::new(backend, table.schema.clone())
    }
}
