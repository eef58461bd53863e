use axum::{Json, Router, extract::State, routing::get};

use crate::db;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tags", get(list_tags))
}

/// GET /api/tags - every tag on any item, sorted
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(db::all_tags(&state.db).await?))
}
