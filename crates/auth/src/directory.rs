//! Cognito user pool group administration.

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::error::DisplayErrorContext;
use aws_sdk_cognitoidentityprovider::Client;

use inventory_core::auth::{DirectoryError, GroupDirectory};

use crate::config::AuthConfig;

/// Adds users to groups of one Cognito user pool.
pub struct CognitoGroupDirectory {
    client: Client,
    user_pool_id: String,
}

impl CognitoGroupDirectory {
    pub fn new(client: Client, user_pool_id: impl Into<String>) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
        }
    }

    /// Creates a directory for the configured pool with the default credential chain.
    pub async fn from_config(config: &AuthConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(Client::new(&sdk_config), config.user_pool_id.clone())
    }
}

#[async_trait]
impl GroupDirectory for CognitoGroupDirectory {
    async fn add_user_to_group(&self, username: &str, group: &str) -> Result<(), DirectoryError> {
        self.client
            .admin_add_user_to_group()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .group_name(group)
            .send()
            .await
            .map_err(|e| DirectoryError(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(username = %username, group = %group, "Added user to group");
        Ok(())
    }
}
