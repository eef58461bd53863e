//! REST service for quickcap items.
//!
//! - `GET /health` (open)
//! - `GET|POST /api/items`, `PUT|DELETE /api/items/{id}`, `GET /api/tags`
//!   (behind `x-api-key` when a key is configured)

pub mod db;
pub mod routes;
mod state;

pub use state::AppState;

use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all routes and layers except tracing.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::items::router())
        .merge(routes::tags::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::require_api_key,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api)
        .merge(routes::health::router())
        .with_state(state)
        .layer(cors)
}
