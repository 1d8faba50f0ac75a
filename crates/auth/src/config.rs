use std::time::Duration;

use crate::error::AuthError;

/// Identity-provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub region: String,
    pub user_pool_id: String,
    /// Expected `aud` of every token.
    pub client_id: String,
    /// `None` fetches the key set on every verification.
    pub jwks_cache_ttl: Option<Duration>,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGION_NAME`: region of the user pool (required)
    /// - `COGNITO_USER_POOL_ID`: user pool id (required)
    /// - `COGNITO_APP_CLIENT_ID`: app client id, checked against `aud` (required)
    /// - `JWKS_CACHE_TTL_SECONDS`: key cache lifetime, `0` disables caching (default: 0)
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(AuthError::MissingEnv(name))
        };

        let jwks_cache_ttl = match lookup("JWKS_CACHE_TTL_SECONDS") {
            None => None,
            Some(raw) => {
                let seconds = raw.parse::<u64>().map_err(|e| AuthError::InvalidEnv {
                    name: "JWKS_CACHE_TTL_SECONDS",
                    reason: e.to_string(),
                })?;
                (seconds > 0).then(|| Duration::from_secs(seconds))
            }
        };

        Ok(Self {
            region: required("REGION_NAME")?,
            user_pool_id: required("COGNITO_USER_POOL_ID")?,
            client_id: required("COGNITO_APP_CLIENT_ID")?,
            jwks_cache_ttl,
        })
    }

    /// Token issuer of the user pool.
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Location of the pool's public signing keys.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }
}
