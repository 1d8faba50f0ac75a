use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("no signing key with kid {0}")]
    UnknownKey(String),

    #[error("unusable signing key: {0}")]
    InvalidKey(String),
}
