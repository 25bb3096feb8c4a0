//! Axum router construction for the query service

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers;
use crate::server::state::AppState;

/// Build the complete router for the query service.
///
/// Routes:
/// - `GET /manifest` -- capability descriptor
/// - `GET /schema/snapshot.json` -- snapshot JSON Schema
/// - `POST /query/snapshot` -- latest cached game state
///
/// Everything else, wrong methods included, answers 404 with a JSON body.
/// CORS is permissive so a browser-hosted advisory client can query the
/// loopback service directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/manifest", get(handlers::manifest))
        .route("/schema/snapshot.json", get(handlers::schema))
        .route("/query/snapshot", post(handlers::query))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
