//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, ApiError>`; every failure becomes a structured JSON body and
//! none of them crash the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::uploads::UploadError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Image upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if is_server_error(&self) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::InsufficientStock { .. } | RepositoryError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateEmail => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Upload(UploadError::NotAnImage) => StatusCode::BAD_REQUEST,
            Self::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Repository(RepositoryError::InsufficientStock { available, held }) => json!({
                "error": "Insufficient stock",
                "available": available,
                "in_cart": held,
            }),
            // Never distinguish a missing account from a wrong password.
            Self::Auth(AuthError::InvalidCredentials) => json!({
                "error": "Invalid email or password",
            }),
            Self::Auth(AuthError::DuplicateEmail) => json!({
                "error": "An account with this email already exists",
            }),
            Self::Auth(AuthError::InvalidEmail(err)) => json!({ "error": err.to_string() }),
            Self::Auth(AuthError::WeakPassword(msg)) => json!({ "error": msg }),
            Self::Repository(RepositoryError::NotFound) | Self::NotFound(_) => json!({
                "error": "Not found",
            }),
            Self::Repository(RepositoryError::Conflict(msg)) => json!({ "error": msg }),
            Self::Upload(err @ UploadError::NotAnImage) => json!({ "error": err.to_string() }),
            Self::BadRequest(msg) => json!({ "error": msg }),
            // Don't expose internal error details to clients
            _ => json!({ "error": "Internal server error" }),
        };

        (status, Json(body)).into_response()
    }
}

/// Whether an error is the server's fault and worth a Sentry event.
fn is_server_error(err: &ApiError) -> bool {
    match err {
        ApiError::Internal(_) => true,
        ApiError::Repository(err) | ApiError::Auth(AuthError::Repository(err)) => matches!(
            err,
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
        ),
        ApiError::Auth(AuthError::PasswordHash) | ApiError::Upload(UploadError::Io(_)) => true,
        _ => false,
    }
}

impl From<crate::services::checkout::CheckoutError> for ApiError {
    fn from(err: crate::services::checkout::CheckoutError) -> Self {
        use crate::services::checkout::CheckoutError;
        match err {
            CheckoutError::Invalid(msg) => Self::BadRequest(msg),
            CheckoutError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = ApiError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            get_status(ApiError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(ApiError::Repository(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Auth(AuthError::DuplicateEmail)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_insufficient_stock_is_conflict() {
        let err = ApiError::Repository(RepositoryError::InsufficientStock {
            available: 2,
            held: 3,
        });
        assert_eq!(get_status(err), StatusCode::CONFLICT);
    }
}
