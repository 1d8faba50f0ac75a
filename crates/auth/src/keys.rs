//! Signing key sources.
//!
//! A [`KeySource`] hands out the public key that signed a token, looked up by
//! the token's `kid`.
//!
//! - [`HttpKeySource`] fetches the published key set on every call.
//! - [`CachedKeySource`] keeps the keys of another source for a while and
//!   refetches on expiry or when a `kid` is unknown (key rotation).
//! - [`StaticKeySource`] serves a fixed key set.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use crate::error::AuthError;

#[async_trait]
pub trait KeySource: Send + Sync {
    /// The full published key set.
    async fn key_set(&self) -> Result<JwkSet, AuthError>;

    /// The key with the given `kid`.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let key_set = self.key_set().await?;
        let jwk = key_set
            .find(kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))?;
        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidKey(e.to_string()))
    }
}

/// Fetches the key set over HTTP with the client's default policy.
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.url, "Fetching signing keys");

        self.client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))
    }
}

/// Serves a fixed key set.
pub struct StaticKeySource {
    key_set: JwkSet,
}

impl StaticKeySource {
    pub fn new(key_set: JwkSet) -> Self {
        Self { key_set }
    }

    /// Parses a JWKS document.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        Ok(self.key_set.clone())
    }
}

struct CachedKeys {
    keys_by_kid: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Caches the keys of another source for a fixed time.
pub struct CachedKeySource<K> {
    inner: K,
    ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl<K: KeySource> CachedKeySource<K> {
    pub fn new(inner: K, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
        }
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        let key_set = self.inner.key_set().await?;

        let keys_by_kid = key_set
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(kid = %kid, error = %e, "Skipping unusable signing key");
                        None
                    }
                }
            })
            .collect::<HashMap<_, _>>();

        tracing::info!(kid_count = keys_by_kid.len(), "Signing keys cached");
        *self.cache.write().await = Some(CachedKeys {
            keys_by_kid,
            fetched_at: Instant::now(),
        });

        Ok(())
    }
}

#[async_trait]
impl<K: KeySource> KeySource for CachedKeySource<K> {
    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        self.inner.key_set().await
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    if let Some(key) = cached.keys_by_kid.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        self.refresh().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys_by_kid.get(kid))
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }
}
