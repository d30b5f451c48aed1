//! Error types for the guestbook server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    MissingToken = 2,
    InvalidToken = 3,
    AdminRequired = 4,
    StoreUnavailable = 5,
    NotFound = 6,
    DuplicateEmail = 7,
    MissingEmail = 8,
    MissingName = 9,
    MissingMessage = 10,
    BadValue = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {1}")]
    Validation(ErrorCode, String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn missing_email() -> Self {
        AppError::Validation(ErrorCode::MissingEmail, "Email is required".to_string())
    }

    pub fn missing_name() -> Self {
        AppError::Validation(ErrorCode::MissingName, "Name is required".to_string())
    }

    pub fn missing_message() -> Self {
        AppError::Validation(ErrorCode::MissingMessage, "Message is required".to_string())
    }

    /// Status and stable code this error maps to
    pub fn code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::MissingToken),
            AppError::InvalidToken(_) => (StatusCode::FORBIDDEN, ErrorCode::InvalidToken),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::AdminRequired),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Validation(code, _) => (StatusCode::BAD_REQUEST, *code),
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StoreUnavailable)
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateEmail),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(ErrorCode::BadValue, errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.code();

        let message = match &self {
            AppError::Authentication(msg)
            | AppError::InvalidToken(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(_, msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
