//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use inventory_core::auth::{AuthFailure, AuthFailureReason, Claims};

use crate::AuthState;

/// Claims of the verified bearer token. Rejects with an empty 401 otherwise.
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Claims);

impl<S> FromRequestParts<S> for VerifiedClaims
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                reject(AuthFailure::new(
                    AuthFailureReason::MalformedHeader,
                    "authorization header is not visible ASCII",
                ))
            })?),
            None => None,
        };

        auth_state
            .verifier()
            .verify(header)
            .await
            .map(VerifiedClaims)
            .map_err(reject)
    }
}

fn reject(failure: AuthFailure) -> StatusCode {
    tracing::warn!(reason = %failure.reason, detail = %failure.detail, "Rejected request");
    StatusCode::UNAUTHORIZED
}
