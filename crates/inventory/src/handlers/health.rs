//! Health check endpoint.

use axum::http::StatusCode;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately without touching the tables or the identity provider.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
