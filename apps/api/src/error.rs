//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ProjectLedger                          │
//! │                                                                         │
//! │  Handler -> Result<T, ApiError>                                         │
//! │       │                                                                 │
//! │       ├── DbError::NotFound          ──► 404 NOT_FOUND                  │
//! │       ├── DbError::InvalidParent     ──► 400 INVALID_PARENT             │
//! │       ├── DbError::BadValue          ──► 400 BAD_VALUE                  │
//! │       ├── DbError::UniqueViolation   ──► 409 CONFLICT                   │
//! │       └── anything else              ──► 500 DATABASE_ERROR (logged)    │
//! │                                                                         │
//! │  Response body:                                                         │
//! │  { "code": "NOT_FOUND", "message": "Client not found: 1f0c..." }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledger_core::{CoreError, ValidationError};
use ledger_db::DbError;
use serde::Serialize;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Course not found: 8a1e..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
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
    /// Resource not found (404)
    NotFound,

    /// Referenced parent entity doesn't exist (400)
    InvalidParent,

    /// Input failed validation or is malformed (400)
    BadValue,

    /// Unique name already taken (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidParent | ErrorCode::BadValue => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
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

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a bad value error.
    pub fn bad_value(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadValue, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::InvalidParent { entity, id } => ApiError::new(
                ErrorCode::InvalidParent,
                format!("{} not found: {}", entity, id),
            ),
            DbError::BadValue(e) => ApiError::from(e),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::InvalidParent, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::CorruptValue { column, value } => {
                tracing::error!(%column, %value, "Corrupt stored value");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from(DbError::from(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_value(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies are bad values too.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_value(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_status_codes() {
        let cases = [
            (DbError::not_found("Client", "x"), StatusCode::NOT_FOUND),
            (DbError::invalid_parent("Course", "x"), StatusCode::BAD_REQUEST),
            (DbError::duplicate("clients.name", "Acme"), StatusCode::CONFLICT),
            (DbError::QueryFailed("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DbError::PoolExhausted, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).code.status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let err = ApiError::from(DbError::QueryFailed("no such table: secrets".into()));
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(ValidationError::NotNumeric {
            field: "value".into(),
            got: "\"abc\"".into(),
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "BAD_VALUE");
        assert_eq!(json["message"], "value must be numeric, got \"abc\"");
    }
}
