//! Shared-secret check for the `/api` routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use quickcap_core::store::API_KEY_HEADER;

use crate::routes::AppError;
use crate::state::AppState;

/// Reject requests whose `x-api-key` doesn't match the configured key.
/// With no key configured every request passes.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected) {
        tracing::warn!(path = %request.uri().path(), "rejected request with missing or wrong API key");
        return Err(AppError::new(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    Ok(next.run(request).await)
}
