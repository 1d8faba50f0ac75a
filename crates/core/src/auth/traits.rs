use async_trait::async_trait;

use super::{AuthFailure, Claims, DirectoryError};

/// Verifies the raw `Authorization` header of a request.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the token claims, or the reason the caller is not authenticated.
    /// Never fails with anything other than [`AuthFailure`].
    async fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthFailure>;
}

/// Group membership administration in the identity provider.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn add_user_to_group(&self, username: &str, group: &str) -> Result<(), DirectoryError>;
}
