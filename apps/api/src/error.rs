//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bizvoice                               │
//! │                                                                         │
//! │  Handler ──► Service ──► Result<T, ApiError>                           │
//! │                │                                                        │
//! │                ├── ValidationError / CoreError ──► VALIDATION_FAILED 400│
//! │                ├── DbError::NotFound ────────────► NOT_FOUND 404        │
//! │                ├── DbError::UniqueViolation ─────► CONFLICT 409         │
//! │                ├── DbError (anything else) ──────► DATABASE_ERROR 500   │
//! │                ├── RenderError ──────────────────► RENDER_FAILED 500    │
//! │                └── AuthError ────────────────────► UNAUTHORIZED 401     │
//! │                                                                         │
//! │  500-class causes are logged here and replaced by a fixed message.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! { "code": "NOT_FOUND", "message": "Invoice not found: 4f0c..." }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use bizvoice_core::CoreError;
use bizvoice_db::DbError;
use bizvoice_pdf::RenderError;

use crate::auth::AuthError;

/// Error returned from every handler.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown username or wrong password (401)
    InvalidCredentials,

    /// Correct password, deactivated account (401)
    AccountInactive,

    /// Missing, invalid or expired token (401)
    Unauthorized,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// Duplicate username, email or other unique value (409)
    Conflict,

    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationFailed,

    /// PDF generation failed (500)
    RenderFailed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::AccountInactive
            | ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::RenderFailed | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Same message for unknown users and wrong passwords.
    pub fn invalid_credentials() -> Self {
        ApiError::new(ErrorCode::InvalidCredentials, "Invalid username or password")
    }

    pub fn account_inactive() -> Self {
        ApiError::new(ErrorCode::AccountInactive, "Account is inactive")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationFailed, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }
            other => {
                error!(error = %other, "Database error");
                ApiError::new(ErrorCode::DatabaseError, "A database error occurred")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<bizvoice_core::ValidationError> for ApiError {
    fn from(err: bizvoice_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        error!(error = %err, "Invoice rendering failed");
        ApiError::new(ErrorCode::RenderFailed, "Failed to generate PDF")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired => ApiError::unauthorized("Token expired"),
            AuthError::InvalidToken(_) => ApiError::unauthorized("Invalid token"),
            AuthError::Signing(_) | AuthError::Hashing(_) => {
                error!(error = %err, "Credential processing failed");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizvoice_core::ValidationError;

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_value(ApiError::invalid_credentials()).unwrap();
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
        assert_eq!(json["message"], "Invalid username or password");
    }

    #[test]
    fn test_status_table() {
        assert_eq!(ErrorCode::AccountInactive.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ValidationFailed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RenderFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_db_errors_map() {
        let err: ApiError = DbError::not_found("Invoice", "abc").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Invoice not found: abc");

        let err: ApiError = DbError::duplicate("users.username", "alice").into();
        assert_eq!(err.code, ErrorCode::Conflict);

        // Internal causes stay out of the message
        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_render_error_is_opaque() {
        let err: ApiError = RenderError::Layout("row too tall".to_string()).into();
        assert_eq!(err.code, ErrorCode::RenderFailed);
        assert!(!err.message.contains("row"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err: ApiError = CoreError::from(ValidationError::Required {
            field: "customer.name".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
