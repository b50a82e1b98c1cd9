//! # Validation Module
//!
//! Input validation for ProjectLedger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names present and bounded                                         │
//! │  ├── Quantities and prices non-negative and bounded                    │
//! │  └── Raw price payloads numeric                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints (names, client/type override pair)             │
//! │  └── Foreign key constraints + ON DELETE CASCADE                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check here runs before the store is touched, so a rejected request
//! never leaves a partial write.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ValidationError;
use crate::{MAX_NAME_LEN, MAX_PRICE, MAX_QUANTITY, MAX_STATUS_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity name (client, lesson type, course, lesson).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_name;
///
/// assert!(validate_name("name", "Acme").is_ok());
/// assert!(validate_name("name", "").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a lesson status label. Free-form, but bounded and non-empty.
pub fn validate_status(status: &str) -> ValidationResult<()> {
    let status = status.trim();

    if status.is_empty() {
        return Err(ValidationError::Required {
            field: "status".to_string(),
        });
    }

    if status.chars().count() > MAX_STATUS_LEN {
        return Err(ValidationError::TooLong {
            field: "status".to_string(),
            max: MAX_STATUS_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a lesson quantity. Zero is allowed (nothing delivered yet),
/// anything above [`MAX_QUANTITY`] is not.
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    validate_bounded("quantity", quantity, MAX_QUANTITY)
}

/// Validates a price (base value or client override). Zero is allowed, the
/// upper bound is [`MAX_PRICE`].
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_price;
/// use rust_decimal::Decimal;
///
/// assert!(validate_price("value", Decimal::new(4250, 2)).is_ok());
/// assert!(validate_price("value", Decimal::ZERO).is_ok());
/// assert!(validate_price("value", Decimal::new(-1, 0)).is_err());
/// ```
pub fn validate_price(field: &str, value: Decimal) -> ValidationResult<()> {
    validate_bounded(field, value, MAX_PRICE)
}

fn validate_bounded(field: &str, value: Decimal, max: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Parses a raw JSON price into a decimal.
///
/// The override endpoint accepts an untyped body, so the value may arrive as a
/// number or as a numeric string. Anything else is a bad value.
///
/// ## Accepted
/// ```text
/// 40        → 40
/// 42.5      → 42.5
/// "40"      → 40
/// " 1e2 "   → 100
/// ```
///
/// ## Rejected
/// ```text
/// "abc", null, true, [], {}   → NotNumeric
/// -5                          → MustBeNonNegative
/// 1e12                        → TooLarge
/// ```
pub fn parse_price(field: &str, raw: &Value) -> ValidationResult<Decimal> {
    let not_numeric = || ValidationError::NotNumeric {
        field: field.to_string(),
        got: raw.to_string(),
    };

    let value = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .ok_or_else(not_numeric)?
            }
        }
        Value::String(s) => parse_decimal_str(s).ok_or_else(not_numeric)?,
        _ => return Err(not_numeric()),
    };

    validate_price(field, value)?;
    Ok(value)
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Acme").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_status() {
        assert!(validate_status("Not started").is_ok());
        assert!(validate_status("").is_err());
        assert!(validate_status(&"x".repeat(MAX_STATUS_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec!(0)).is_ok());
        assert!(validate_quantity(dec!(1.5)).is_ok());
        assert!(validate_quantity(dec!(-0.5)).is_err());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());

        let err = validate_quantity(MAX_QUANTITY + dec!(0.5)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(err.to_string(), "quantity must be at most 100000");
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price("value", MAX_PRICE).is_ok());
        assert!(matches!(
            validate_price("value", MAX_PRICE + dec!(0.01)),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_parse_price_numbers() {
        assert_eq!(parse_price("value", &json!(40)).unwrap(), dec!(40));
        assert_eq!(parse_price("value", &json!(42.5)).unwrap(), dec!(42.5));
        assert_eq!(parse_price("value", &json!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn test_parse_price_numeric_strings() {
        assert_eq!(parse_price("value", &json!("40")).unwrap(), dec!(40));
        assert_eq!(parse_price("value", &json!(" 12.75 ")).unwrap(), dec!(12.75));
        assert_eq!(parse_price("value", &json!("1e2")).unwrap(), dec!(100));
    }

    #[test]
    fn test_parse_price_rejects_non_numeric() {
        for raw in [json!("abc"), json!(null), json!(true), json!([]), json!({})] {
            let err = parse_price("value", &raw).unwrap_err();
            assert!(matches!(err, ValidationError::NotNumeric { .. }), "{raw}");
        }
    }

    #[test]
    fn test_parse_price_rejects_negative() {
        let err = parse_price("value", &json!(-5)).unwrap_err();
        assert!(matches!(err, ValidationError::MustBeNonNegative { .. }));
    }

    #[test]
    fn test_parse_price_rejects_too_large() {
        for raw in [json!(1e28), json!("1e12"), json!("79228162514264337593543950335")] {
            let err = parse_price("value", &raw).unwrap_err();
            assert!(matches!(err, ValidationError::TooLarge { .. }), "{raw}");
        }
    }
}
