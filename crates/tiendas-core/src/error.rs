//! # Error Types
//!
//! Domain-specific error types for tiendas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tiendas-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form field validation failures                 │
//! │                                                                         │
//! │  tiendas-client errors (separate crate)                                │
//! │  └── ClientError      - Transport / API failures                       │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors map → form error state       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant names the field it belongs to
//! 3. `Display` output is the message shown next to the form field

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Order arithmetic left the range of representable cents.
    #[error("Amount out of range while computing the {what}")]
    AmountOverflow { what: &'static str },

    /// A decimal amount could not be parsed into cents.
    #[error("Invalid amount '{value}'")]
    InvalidAmount { value: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are produced by the field validators and collected per field by
/// [`crate::form::FormValidator`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value is not a number.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Invalid format (e.g., bad characters, bad date layout).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Card number fails the Luhn checksum.
    #[error("{field} is not a valid card number")]
    ChecksumMismatch { field: String },

    /// Card expiry date is in the past.
    #[error("{field} is in the past")]
    Expired { field: String },

    /// Card expiry date is unreasonably far in the future.
    #[error("{field} cannot be more than {max_years} years in the future")]
    TooFarInFuture { field: String, max_years: u32 },

    /// Duplicate value (e.g., a payment method name already in use).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::NotANumber { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::ChecksumMismatch { field }
            | ValidationError::Expired { field }
            | ValidationError::TooFarInFuture { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooShort {
            field: "cardholder_name".to_string(),
            min: 2,
        };
        assert_eq!(
            err.to_string(),
            "cardholder_name must be at least 2 characters"
        );

        let err = ValidationError::TooFarInFuture {
            field: "expiry_date".to_string(),
            max_years: 20,
        };
        assert_eq!(
            err.to_string(),
            "expiry_date cannot be more than 20 years in the future"
        );
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::Duplicate {
            field: "name".to_string(),
            value: "Visa".to_string(),
        };
        assert_eq!(err.field(), "name");
        assert_eq!(err.to_string(), "name 'Visa' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NotANumber {
            field: "commission".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_overflow_message() {
        let err = CoreError::AmountOverflow { what: "subtotal" };
        assert_eq!(err.to_string(), "Amount out of range while computing the subtotal");
    }
}
