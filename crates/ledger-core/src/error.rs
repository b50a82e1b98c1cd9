//! # Error Types
//!
//! Domain-specific error types for ledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledger-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors (NotFound, InvalidParent, ...)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ledger-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  ledger-api errors (in app)                                            │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A broken reference chain during price resolution is NOT an error here.
//! It resolves to a zero price (see [`crate::pricing`]).

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested entity id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A create/update references a parent or foreign entity that does not exist.
    ///
    /// ## When This Occurs
    /// - Course created for an unknown client
    /// - Lesson created for an unknown course or lesson type
    #[error("{entity} not found: {id}")]
    InvalidParent { entity: &'static str, id: String },

    /// A supplied value failed type or range validation (the "bad value" condition).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an InvalidParent error.
    pub fn invalid_parent(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::InvalidParent {
            entity,
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant is a "bad value": raised before any mutation so a rejected
/// request never writes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is above its upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: Decimal },

    /// Value is not a number.
    #[error("{field} must be numeric, got {got}")]
    NotNumeric { field: String, got: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Client", "abc");
        assert_eq!(err.to_string(), "Client not found: abc");

        let err = CoreError::invalid_parent("Course", "xyz");
        assert_eq!(err.to_string(), "Course not found: xyz");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::NotNumeric {
            field: "value".to_string(),
            got: "\"abc\"".to_string(),
        };
        assert_eq!(err.to_string(), "value must be numeric, got \"abc\"");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
