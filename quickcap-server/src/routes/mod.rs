pub mod auth;
pub mod health;
pub mod items;
pub mod tags;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quickcap_core::CaptureError;
use serde::Serialize;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        AppError {
            status,
            message: message.into(),
        }
    }

    pub fn item_not_found() -> Self {
        AppError::new(StatusCode::NOT_FOUND, "Item not found")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        let status = match &err {
            CaptureError::NotFound(_) => StatusCode::NOT_FOUND,
            CaptureError::InvalidItem(_) | CaptureError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CaptureError::Parse(_) | CaptureError::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::new(rejection.status(), rejection.body_text())
    }
}
