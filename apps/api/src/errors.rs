use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::autosave::AutosaveError;
use crate::editor::picture::PictureError;
use crate::editor::EditError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Export error: {0}")]
    Export(String),
}

// A closed coordinator means the session was signed out underneath the request.
impl From<AutosaveError> for AppError {
    fn from(e: AutosaveError) -> Self {
        match e {
            AutosaveError::Store(e) => AppError::Store(e),
            AutosaveError::Closed => AppError::Unauthorized,
        }
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::UnknownEntry { .. } => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<PictureError> for AppError {
    fn from(e: PictureError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Sign in to edit your resume".to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (StatusCode::BAD_GATEWAY, "STORE_ERROR", e.to_string())
            }
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXPORT_ERROR",
                    "There was an error generating your PDF. Please try again.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
