//! Application error type shared by the domain layer and the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::routes::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing field, malformed or reserved url_path, broken taxonomy link
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Delete blocked by a referential or predefined-status rule
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(msg) => ErrorResponse {
                error: "Validation failed".to_string(),
                message: Some(msg),
            },
            AppError::NotFound(msg) => ErrorResponse {
                error: "Not found".to_string(),
                message: Some(msg),
            },
            AppError::Conflict(msg) => ErrorResponse {
                error: "Conflict".to_string(),
                message: Some(msg),
            },
            AppError::Unauthorized(msg) => ErrorResponse {
                error: msg,
                message: None,
            },
            // Internal detail stays in the logs, never in the response body.
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    message: None,
                }
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    message: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
