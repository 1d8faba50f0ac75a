use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{
    handlers::{
        components::handle_components, health::livez, organization::get_organization, preflight,
        register::register_user,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// `/organization` and `/register` are only mounted when the account tables are
/// configured. Requests run until the stores answer; there is no timeout layer.
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/components", post(handle_components).options(preflight))
        .route("/livez", get(livez));

    if state.accounts.is_some() {
        router = router
            .route("/organization", post(get_organization).options(preflight))
            .route("/register", post(register_user).options(preflight));
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
