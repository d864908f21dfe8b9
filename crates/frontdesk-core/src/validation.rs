//! # Validation Module
//!
//! Input validation for desk requests (attaching services, choosing a report
//! range). Booking API records themselves are never validated here: the
//! engine and aggregator degrade to `false`/zero on odd data instead.
//!
//! ## Usage
//! ```rust
//! use frontdesk_core::validation::{parse_report_date, validate_service_quantity};
//!
//! assert!(validate_service_quantity(2).is_ok());
//! assert!(parse_report_date("from", "2024-03-01").is_ok());
//! assert!(parse_report_date("from", "03/01/2024").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_SERVICE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of an additional service line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_SERVICE_QUANTITY
pub fn validate_service_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SERVICE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SERVICE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog unit price. Zero is allowed (complimentary services).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` report bound.
pub fn parse_report_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_service_quantity() {
        assert!(validate_service_quantity(1).is_ok());
        assert!(validate_service_quantity(MAX_SERVICE_QUANTITY).is_ok());

        assert!(validate_service_quantity(0).is_err());
        assert!(validate_service_quantity(-3).is_err());
        assert!(validate_service_quantity(MAX_SERVICE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_minor(150_000)).is_ok());
        assert!(validate_unit_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_parse_report_date() {
        assert_eq!(
            parse_report_date("from", "2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(
            parse_report_date("to", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_report_date("to", "2024-13-01"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
