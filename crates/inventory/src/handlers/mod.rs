pub mod components;
pub mod error;
pub mod health;
pub mod organization;
pub mod register;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use inventory_core::response::Envelope;
use serde::Serialize;

pub use error::ApiError;

/// OPTIONS - CORS preflight, answered before authentication.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Renders an envelope as a 200 JSON response.
fn envelope_response<P: Serialize>(envelope: &Envelope<P>) -> Result<Response, ApiError> {
    let body = envelope.render()?;
    tracing::debug!(result = ?envelope.result, message = %envelope.message, "Returning response");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
