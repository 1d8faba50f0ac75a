use crate::request::Action;

use super::{AuthFailure, AuthFailureReason, Claims};

/// Groups allowed to change data.
pub const PRIVILEGED_GROUPS: [&str; 2] = ["editor", "admin"];

/// Whether the claims carry at least one privileged group.
pub fn can_edit(claims: &Claims) -> bool {
    claims
        .groups()
        .iter()
        .any(|group| PRIVILEGED_GROUPS.contains(&group.as_str()))
}

/// Reads are open to every authenticated caller; mutations need [`can_edit`].
pub fn permits(claims: &Claims, action: Action) -> bool {
    !action.is_mutating() || can_edit(claims)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthFailure> {
    let header = header.ok_or_else(|| {
        AuthFailure::new(
            AuthFailureReason::MissingHeader,
            "authorization header is missing",
        )
    })?;

    match header.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthFailure::new(
            AuthFailureReason::MalformedHeader,
            "authorization header is not a bearer token",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(groups: &[&str]) -> Claims {
        Claims::default().with_groups(groups.iter().copied())
    }

    #[test]
    fn test_can_edit_requires_privileged_group() {
        assert!(can_edit(&claims(&["viewer", "editor"])));
        assert!(can_edit(&claims(&["admin"])));
        assert!(!can_edit(&claims(&["viewer"])));
        assert!(!can_edit(&claims(&[])));
    }

    #[test]
    fn test_viewers_may_query_but_not_mutate() {
        let viewer = claims(&["viewer"]);
        assert!(permits(&viewer, Action::Query));
        assert!(!permits(&viewer, Action::Put));
        assert!(!permits(&viewer, Action::Update));
        assert!(!permits(&viewer, Action::Delete));
    }

    #[test]
    fn test_extract_bearer_token_returns_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_extract_bearer_token_rejects_missing_and_malformed_headers() {
        let missing = extract_bearer_token(None).unwrap_err();
        assert_eq!(missing.reason, AuthFailureReason::MissingHeader);

        for header in ["Basic abc", "Bearer ", "Bearer", "abc"] {
            let failure = extract_bearer_token(Some(header)).unwrap_err();
            assert_eq!(failure.reason, AuthFailureReason::MalformedHeader);
        }
    }
}
