use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Application error taxonomy. Every handler returns `Result<_, AppError>`
/// and the HTTP mapping lives in one place.
#[derive(Debug, Error)]
pub enum AppError {
    /// Covers both unknown email and wrong password; the message must not
    /// reveal which one it was.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing Authorization header")]
    Unauthenticated,
    /// Bad signature, malformed payload, or expired token. Kept separate
    /// from `Unauthenticated` even though both map to 401.
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Leave request already processed")]
    InvalidTransition,
    #[error("Insufficient leave balance")]
    InsufficientBalance,
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Internal Server Error")]
    Database(#[source] sqlx::Error),
    #[error("Internal Server Error")]
    Internal(#[source] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("record"),
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::AlreadyDecided => AppError::InvalidTransition,
            StoreError::InsufficientBalance => AppError::InsufficientBalance,
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthenticated | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition
            | AppError::InsufficientBalance
            | AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(e) => error!(error = %e, "database failure"),
            AppError::Internal(e) => error!(error = %e, "internal failure"),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
