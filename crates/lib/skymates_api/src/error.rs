//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use skymates_core::error::{CoreError, ErrorKind};
use thiserror::Error;
use tracing::error;

use crate::models::Envelope;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(m)
            | AppError::NotFound(m)
            | AppError::AlreadyExists(m)
            | AppError::Conflict(m)
            | AppError::Forbidden(m) => m.clone(),
            AppError::Unauthorized => "unauthorized".to_string(),
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                "Internal server error".to_string()
            }
        };
        (status, Json(Envelope::<()>::message(message))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(e.message().to_string()),
            ErrorKind::AlreadyExists => AppError::AlreadyExists(e.message().to_string()),
            ErrorKind::Validation => AppError::Validation(e.message().to_string()),
            ErrorKind::Unauthorized => AppError::Unauthorized,
            ErrorKind::Forbidden => AppError::Forbidden(e.message().to_string()),
            ErrorKind::Conflict => AppError::Conflict(e.message().to_string()),
            ErrorKind::Internal => AppError::Internal(e.detailed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use skymates_core::auth::TokenError;

    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        let cases = [
            (CoreError::not_found("x"), StatusCode::NOT_FOUND),
            (CoreError::already_exists("x"), StatusCode::CONFLICT),
            (CoreError::validation("x"), StatusCode::BAD_REQUEST),
            (CoreError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (CoreError::forbidden("x"), StatusCode::FORBIDDEN),
            (CoreError::conflict("x"), StatusCode::CONFLICT),
        ];
        for (core, status) in cases {
            assert_eq!(AppError::from(core).status(), status);
        }
    }

    #[test]
    fn token_failures_hide_the_cause() {
        let app = AppError::from(CoreError::from(TokenError::BadSignature));
        assert!(matches!(app, AppError::Unauthorized));
        assert_eq!(app.to_string(), "Unauthorized");
    }
}
