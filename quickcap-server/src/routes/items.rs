//! Item endpoints
//!
//! The server is the authority for identity in REST mode: ids, display
//! numbers and both timestamps are stamped here, whatever the client sent.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};
use chrono::Utc;
use quickcap_core::{CaptureError, Draft, Item};
use serde::Deserialize;
use serde_json::Value;

use crate::db;
use crate::routes::AppError;
use crate::state::AppState;

/// Fields a client can never set through PUT.
const SERVER_OWNED: [&str; 4] = ["id", "created_at", "updated_at", "sequential_id"];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/{id}", put(update_item).delete(delete_item))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub include_closed: Option<bool>,
}

/// GET /api/items - newest first
async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Item>>, AppError> {
    let items = db::list_items(&state.db, params.include_closed.unwrap_or(true)).await?;
    Ok(Json(items))
}

/// POST /api/items
///
/// A client-chosen id is kept when no other item has it, so records synced
/// from a local store keep their identity.
async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(mut draft) = payload?;
    draft.created_at = None;
    draft.updated_at = None;
    draft.sequential_id = None;

    let mut tx = state.db.begin().await?;

    if let Some(id) = draft.id.as_deref() {
        if db::get_item(&mut *tx, id).await?.is_some() {
            tracing::debug!(%id, "requested id already taken, minting a new one");
            draft.id = None;
        }
    }

    let sequence = db::next_sequence(&mut *tx).await?;
    let item = Item::stamp(draft, None, Utc::now(), sequence)?;
    db::put_item(&mut *tx, &item).await?;
    tx.commit().await?;

    tracing::info!(id = %item.id, number = ?item.sequential_id, "created item");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/:id
///
/// The body's fields are laid over the stored record (an explicit `null`
/// clears a field) and the result is re-stamped.
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(body) = payload?;
    let Value::Object(changes) = body else {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object",
        ));
    };

    let mut tx = state.db.begin().await?;
    let existing = db::get_item(&mut *tx, &id)
        .await?
        .ok_or_else(AppError::item_not_found)?;

    let mut record = serde_json::to_value(&existing).map_err(CaptureError::from)?;
    if let Value::Object(fields) = &mut record {
        for (key, value) in changes {
            if !SERVER_OWNED.contains(&key.as_str()) {
                fields.insert(key, value);
            }
        }
    }
    let draft: Draft = serde_json::from_value(record)
        .map_err(|e| CaptureError::Parse(format!("Invalid item fields: {}", e)))?;

    let sequence = db::next_sequence(&mut *tx).await?;
    let item = Item::stamp(draft, Some(&existing), Utc::now(), sequence)?;
    db::put_item(&mut *tx, &item).await?;
    tx.commit().await?;

    tracing::info!(id = %item.id, "updated item");
    Ok(Json(item))
}

/// DELETE /api/items/:id
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_item(&state.db, &id).await? {
        return Err(AppError::item_not_found());
    }
    tracing::info!(%id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}
