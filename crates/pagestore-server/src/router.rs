use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Path of the editor endpoint.
pub const EDITOR_PATH: &str = "/api/builder/handle";

/// Build the axum router with all pagestore endpoints.
///
/// CORS mirrors the caller's origin and allows credentials, so the page
/// builder can be served from a different dev-server port.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/ping", get(handler::ping))
        .route(EDITOR_PATH, any(handler::handle_editor))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
