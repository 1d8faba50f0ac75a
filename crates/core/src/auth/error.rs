use std::fmt;

use thiserror::Error;

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureReason {
    MissingHeader,
    MalformedHeader,
    MalformedToken,
    ExpiredToken,
    InvalidAudience,
    InvalidIssuer,
    InvalidSignature,
    UnknownKey,
    KeyFetchFailed,
    Other,
}

impl fmt::Display for AuthFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::MalformedToken => "malformed_token",
            Self::ExpiredToken => "expired_token",
            Self::InvalidAudience => "invalid_audience",
            Self::InvalidIssuer => "invalid_issuer",
            Self::InvalidSignature => "invalid_signature",
            Self::UnknownKey => "unknown_key",
            Self::KeyFetchFailed => "key_fetch_failed",
            Self::Other => "other",
        };
        f.write_str(reason)
    }
}

/// A failed token verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("authentication failed ({reason}): {detail}")]
pub struct AuthFailure {
    pub reason: AuthFailureReason,
    pub detail: String,
}

impl AuthFailure {
    pub fn new(reason: AuthFailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("group directory error: {0}")]
pub struct DirectoryError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_display_includes_reason() {
        let failure = AuthFailure::new(AuthFailureReason::ExpiredToken, "exp in the past");
        assert_eq!(
            failure.to_string(),
            "authentication failed (expired_token): exp in the past"
        );
    }
}
