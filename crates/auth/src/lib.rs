//! Bearer token authentication for the inventory service.
//!
//! This crate provides:
//! - Signing key sources for identity-provider tokens (HTTP, cached, static)
//! - [`JwtVerifier`], the RS256 implementation of `TokenVerifier`
//! - A Cognito-backed `GroupDirectory` (feature `cognito`)
//! - The [`VerifiedClaims`] axum extractor

mod config;
#[cfg(feature = "cognito")]
mod directory;
mod error;
mod extractors;
mod keys;
mod state;
mod verifier;

pub use config::AuthConfig;
#[cfg(feature = "cognito")]
pub use directory::CognitoGroupDirectory;
pub use error::AuthError;
pub use extractors::VerifiedClaims;
pub use keys::{CachedKeySource, HttpKeySource, KeySource, StaticKeySource};
pub use state::AuthState;
pub use verifier::JwtVerifier;
