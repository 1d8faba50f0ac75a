//! RS256 bearer token verification.

use async_trait::async_trait;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use inventory_core::auth::{
    extract_bearer_token, AuthFailure, AuthFailureReason, Claims, TokenVerifier,
};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::keys::KeySource;

/// Verifies identity-provider tokens against a [`KeySource`].
///
/// Checks the RS256 signature, expiry, audience and issuer.
pub struct JwtVerifier<K> {
    keys: K,
    validation: Validation,
}

impl<K: KeySource> JwtVerifier<K> {
    pub fn new(keys: K, config: &AuthConfig) -> Self {
        Self::with_audience_and_issuer(keys, &config.client_id, &config.issuer())
    }

    pub fn with_audience_and_issuer(keys: K, audience: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        Self { keys, validation }
    }

    /// Verifies a bare token.
    pub async fn verify_token(&self, token: &str) -> Result<Claims, AuthFailure> {
        let header = decode_header(token).map_err(failure_from_jwt_error)?;
        let kid = header.kid.ok_or_else(|| {
            AuthFailure::new(AuthFailureReason::UnknownKey, "token header has no kid")
        })?;

        let key = self
            .keys
            .decoding_key(&kid)
            .await
            .map_err(failure_from_key_error)?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(failure_from_jwt_error)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl<K: KeySource> TokenVerifier for JwtVerifier<K> {
    async fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthFailure> {
        let token = extract_bearer_token(authorization)?;
        self.verify_token(token).await
    }
}

fn failure_from_key_error(error: AuthError) -> AuthFailure {
    let reason = match error {
        AuthError::UnknownKey(_) => AuthFailureReason::UnknownKey,
        AuthError::KeyFetch(_) => AuthFailureReason::KeyFetchFailed,
        _ => AuthFailureReason::Other,
    };
    AuthFailure::new(reason, error.to_string())
}

fn failure_from_jwt_error(error: JwtError) -> AuthFailure {
    let reason = match error.kind() {
        ErrorKind::ExpiredSignature => AuthFailureReason::ExpiredToken,
        ErrorKind::InvalidAudience => AuthFailureReason::InvalidAudience,
        ErrorKind::InvalidIssuer => AuthFailureReason::InvalidIssuer,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            AuthFailureReason::InvalidSignature
        }
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => AuthFailureReason::MalformedToken,
        _ => AuthFailureReason::Other,
    };
    AuthFailure::new(reason, error.to_string())
}
