use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::errors::{ErrorKind, MatchError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str, bool) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", false),
            AppError::Match(e) => {
                let kind = e.kind();
                let status = match kind {
                    ErrorKind::ProfileNotFound => StatusCode::NOT_FOUND,
                    ErrorKind::InvalidRoleCombination => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::PersistenceError => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, kind.code(), kind.is_retryable())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = self.status_and_code();

        let message = match &self {
            AppError::Match(MatchError::Persistence(e)) => {
                tracing::error!("Persistence error: {e}");
                "Couldn't save your like, please try again".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            }
        }));

        (status, body).into_response()
    }
}
