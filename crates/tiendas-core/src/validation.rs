//! # Validation Module
//!
//! Field validators for the admin panel and the OTP login form.
//! Card-specific validators live in [`crate::payment`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field validator (THIS MODULE)                                │
//! │  ├── One pure function per field                                       │
//! │  └── Runs on every change / blur                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: FormValidator (form.rs)                                      │
//! │  └── Collects failing fields, gates submission                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store API                                                    │
//! │  └── Unique constraints, foreign keys                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tiendas_core::validation::{validate_commission, validate_name, PAYMENT_METHOD_NAME};
//!
//! assert!(validate_name("Transferencia", &PAYMENT_METHOD_NAME).is_ok());
//! assert_eq!(validate_commission("2.5").unwrap(), 2.5);
//! ```

use crate::error::ValidationError;
use crate::types::NamedRecord;
use crate::MAX_COMMISSION_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accented letters accepted in names, on top of ASCII letters.
pub const ACCENTED_LETTERS: &str = "áéíóúüÁÉÍÓÚÜñÑ";

// =============================================================================
// Name Rules
// =============================================================================

/// Length bounds for a name-like field, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRules {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

pub const PAYMENT_METHOD_NAME: NameRules = NameRules {
    field: "name",
    min: 2,
    max: 50,
};

pub const CATEGORY_NAME: NameRules = NameRules {
    field: "name",
    min: 2,
    max: 50,
};

pub const SUBCATEGORY_NAME: NameRules = NameRules {
    field: "name",
    min: 2,
    max: 50,
};

pub const MASTER_RECORD_NAME: NameRules = NameRules {
    field: "name",
    min: 2,
    max: 50,
};

/// Letters accepted anywhere a human-entered name is: ASCII plus the
/// Spanish accented set.
#[inline]
pub fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ACCENTED_LETTERS.contains(c)
}

#[inline]
fn is_name_char(c: char) -> bool {
    is_name_letter(c) || c.is_ascii_digit() || c == ' ' || c == '-' || c == '_'
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog name (payment method, category, subcategory...).
///
/// ## Rules
/// - Trimmed before checking
/// - Must not be empty
/// - Length within `rules.min..=rules.max` characters
/// - Letters (accented and ñ included), digits, spaces, hyphens, underscores
///
/// Uniqueness is checked separately by [`check_duplicate_name`].
///
/// ## Example
/// ```rust
/// use tiendas_core::validation::{validate_name, CATEGORY_NAME};
///
/// assert!(validate_name("Electrónica", &CATEGORY_NAME).is_ok());
/// assert!(validate_name("  ", &CATEGORY_NAME).is_err());
/// assert!(validate_name("Ropa & Moda", &CATEGORY_NAME).is_err());
/// ```
pub fn validate_name(raw: &str, rules: &NameRules) -> ValidationResult<()> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: rules.field.to_string(),
        });
    }

    let len = name.chars().count();
    if len < rules.min {
        return Err(ValidationError::TooShort {
            field: rules.field.to_string(),
            min: rules.min,
        });
    }
    if len > rules.max {
        return Err(ValidationError::TooLong {
            field: rules.field.to_string(),
            max: rules.max,
        });
    }

    if !name.chars().all(is_name_char) {
        return Err(ValidationError::InvalidFormat {
            field: rules.field.to_string(),
            reason: "must contain only letters, numbers, spaces, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates an e-mail address before requesting a login code.
///
/// ## Rules
/// - Must not be empty, at most 254 characters, no whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a `.` that is neither its first nor last character
pub fn validate_email(raw: &str) -> ValidationResult<String> {
    let email = raw.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.chars().count() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid e-mail address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.find('.') {
        Some(_) if !domain.starts_with('.') && !domain.ends_with('.') => {}
        _ => return Err(invalid()),
    }

    Ok(email.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a payment-method commission percentage.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a finite number
/// - Must be between 0 and 100 inclusive
///
/// ## Returns
/// The parsed percentage.
///
/// ## Example
/// ```rust
/// use tiendas_core::validation::validate_commission;
///
/// assert!(validate_commission("50").is_ok());
/// assert!(validate_commission("150").is_err());
/// assert!(validate_commission("-1").is_err());
/// ```
pub fn validate_commission(raw: &str) -> ValidationResult<f64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "commission".to_string(),
        });
    }

    let value: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field: "commission".to_string(),
        })?;

    validate_commission_value(value)
}

/// Same rules as [`validate_commission`], for a value that arrived as a number.
pub fn validate_commission_value(value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: "commission".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: "commission".to_string(),
        });
    }

    if value > MAX_COMMISSION_PERCENT {
        return Err(ValidationError::OutOfRange {
            field: "commission".to_string(),
            min: 0,
            max: MAX_COMMISSION_PERCENT as i64,
        });
    }

    Ok(value)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Returns true if `name` is already taken in `existing`.
///
/// Comparison trims both sides and ignores case. When editing, pass the
/// record's own id as `exclude_id` so it does not collide with itself.
///
/// ## Example
/// ```rust
/// use tiendas_core::types::CatalogRecord;
/// use tiendas_core::validation::check_duplicate_name;
///
/// let existing = vec![CatalogRecord { id: 1, nombre: "Visa".to_string() }];
/// assert!(check_duplicate_name("visa", &existing, None));
/// assert!(!check_duplicate_name("visa", &existing, Some(1)));
/// ```
pub fn check_duplicate_name<R: NamedRecord>(
    name: &str,
    existing: &[R],
    exclude_id: Option<i64>,
) -> bool {
    let wanted = name.trim().to_lowercase();

    existing
        .iter()
        .filter(|record| Some(record.record_id()) != exclude_id)
        .any(|record| record.record_name().trim().to_lowercase() == wanted)
}

/// [`check_duplicate_name`] as a validator, for use in form rules.
pub fn validate_unique_name<R: NamedRecord>(
    name: &str,
    existing: &[R],
    exclude_id: Option<i64>,
) -> ValidationResult<()> {
    if check_duplicate_name(name, existing, exclude_id) {
        return Err(ValidationError::Duplicate {
            field: "name".to_string(),
            value: name.trim().to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogRecord;
    use proptest::prelude::*;

    fn catalog() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord {
                id: 1,
                nombre: "Visa".to_string(),
            },
            CatalogRecord {
                id: 2,
                nombre: " Mercado Pago ".to_string(),
            },
        ]
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Visa", &PAYMENT_METHOD_NAME).is_ok());
        assert!(validate_name("Niño_2-go", &PAYMENT_METHOD_NAME).is_ok());
        assert!(validate_name("  Açaí  ", &PAYMENT_METHOD_NAME).is_err());
        assert!(validate_name("Café Ñandú", &CATEGORY_NAME).is_ok());

        assert!(matches!(
            validate_name("", &PAYMENT_METHOD_NAME),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name(" a ", &PAYMENT_METHOD_NAME),
            Err(ValidationError::TooShort { min: 2, .. })
        ));
        assert!(matches!(
            validate_name(&"a".repeat(51), &PAYMENT_METHOD_NAME),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
        assert!(matches!(
            validate_name("Visa!", &PAYMENT_METHOD_NAME),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 50 accented characters are 100 bytes but still within the limit.
        assert!(validate_name(&"é".repeat(50), &CATEGORY_NAME).is_ok());
    }

    #[test]
    fn test_validate_commission() {
        assert_eq!(validate_commission("50"), Ok(50.0));
        assert_eq!(validate_commission(" 0 "), Ok(0.0));
        assert_eq!(validate_commission("100"), Ok(100.0));
        assert_eq!(validate_commission("3.75"), Ok(3.75));

        assert!(matches!(
            validate_commission(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_commission("abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate_commission("NaN"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate_commission("-1"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_commission("150"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_commission("100.01").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" ana@tienda.com ").unwrap(),
            "ana@tienda.com"
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@tienda.com").is_err());
        assert!(validate_email("ana@tienda").is_err());
        assert!(validate_email("ana@.com").is_err());
        assert!(validate_email("ana@tienda.").is_err());
        assert!(validate_email("ana@@tienda.com").is_err());
        assert!(validate_email("an a@tienda.com").is_err());
    }

    #[test]
    fn test_check_duplicate_name() {
        let existing = catalog();

        assert!(check_duplicate_name("visa", &existing, None));
        assert!(check_duplicate_name("  VISA ", &existing, None));
        assert!(check_duplicate_name("mercado pago", &existing, None));
        assert!(!check_duplicate_name("visa", &existing, Some(1)));
        assert!(check_duplicate_name("visa", &existing, Some(2)));
        assert!(!check_duplicate_name("Mastercard", &existing, None));
        assert!(!check_duplicate_name("visa", &Vec::<CatalogRecord>::new(), None));
    }

    #[test]
    fn test_validate_unique_name() {
        let existing = catalog();
        let err = validate_unique_name("Visa", &existing, None).unwrap_err();
        assert_eq!(err.to_string(), "name 'Visa' already exists");
        assert!(validate_unique_name("Visa", &existing, Some(1)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_disallowed_character_is_rejected(
            prefix in "[a-z]{1,10}",
            bad in "[!@#$%&*+=?/\\\\.,;:()<>]",
            suffix in "[a-z]{1,10}",
        ) {
            let name = format!("{prefix}{bad}{suffix}");
            prop_assert!(validate_name(&name, &CATEGORY_NAME).is_err());
        }

        #[test]
        fn prop_commission_in_range_is_accepted(value in 0.0f64..=100.0) {
            prop_assert_eq!(validate_commission(&value.to_string()), Ok(value));
        }
    }
}
