//! # Payment Card Validation
//!
//! Validators for the checkout card form: card number, expiry date and
//! cardholder name.
//!
//! ## Checkout Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Card form                                                              │
//! │                                                                         │
//! │  "4539 1488 0343 6467" ──► validate_card_number ──► strip spaces       │
//! │                                                     13-19 digits        │
//! │                                                     Luhn checksum       │
//! │                                                                         │
//! │  "08/27" ──────────────► validate_expiry_date ───► MM/YY, 1-12         │
//! │                                                     not past            │
//! │                                                     ≤ 20 years ahead    │
//! │                                                                         │
//! │  "María López" ────────► validate_cardholder_name ► 2-50 letters/space │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::validation::{is_name_letter, ValidationResult};

/// Shortest card number accepted (digits).
pub const CARD_NUMBER_MIN_DIGITS: usize = 13;

/// Longest card number accepted (digits).
pub const CARD_NUMBER_MAX_DIGITS: usize = 19;

/// How far ahead an expiry year may be.
pub const MAX_EXPIRY_YEARS_AHEAD: u32 = 20;

/// Cardholder name length bounds (characters).
pub const CARDHOLDER_MIN_CHARS: usize = 2;
pub const CARDHOLDER_MAX_CHARS: usize = 50;

// =============================================================================
// Luhn Checksum
// =============================================================================

/// Luhn (mod 10) checksum over a digit string.
///
/// Walks the digits from the right; every second one is doubled, and 9 is
/// subtracted whenever the doubled value exceeds 9. The number is valid when
/// the sum of all resulting digits is a multiple of 10.
///
/// Returns false for an empty string or any non-digit character.
///
/// ## Example
/// ```rust
/// use tiendas_core::payment::luhn_checksum_valid;
///
/// assert!(luhn_checksum_valid("79927398713"));
/// assert!(!luhn_checksum_valid("79927398710"));
/// ```
pub fn luhn_checksum_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (index, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if index % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}

// =============================================================================
// Card Number
// =============================================================================

/// Validates a card number as typed by the customer.
///
/// ## Rules
/// - All whitespace is removed first ("4539 1488 ..." is fine)
/// - Must not be empty
/// - Only digits, 13 to 19 of them
/// - Must pass the Luhn checksum
///
/// ## Returns
/// The normalized digit string.
pub fn validate_card_number(raw: &str) -> ValidationResult<String> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "card_number".to_string(),
        });
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "card_number".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !(CARD_NUMBER_MIN_DIGITS..=CARD_NUMBER_MAX_DIGITS).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "card_number".to_string(),
            reason: format!(
                "must have between {} and {} digits",
                CARD_NUMBER_MIN_DIGITS, CARD_NUMBER_MAX_DIGITS
            ),
        });
    }

    if !luhn_checksum_valid(&digits) {
        return Err(ValidationError::ChecksumMismatch {
            field: "card_number".to_string(),
        });
    }

    Ok(digits)
}

// =============================================================================
// Expiry Date
// =============================================================================

/// A parsed `MM/YY` expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    pub month: u32,
    /// Two-digit year (0-99).
    pub year: u32,
}

/// Validates a card expiry date against `today`.
///
/// ## Rules
/// - Exactly `MM/YY` (two digits, slash, two digits)
/// - Month between 1 and 12
/// - Not before the current month (two-digit year comparison)
/// - Year no more than 20 years after the current two-digit year
///
/// `today` is passed in so the check stays deterministic; callers usually
/// hand it `Utc::now().date_naive()`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tiendas_core::payment::validate_expiry_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// assert!(validate_expiry_date("06/25", today).is_ok());
/// assert!(validate_expiry_date("05/25", today).is_err());
/// assert!(validate_expiry_date("13/30", today).is_err());
/// ```
pub fn validate_expiry_date(raw: &str, today: NaiveDate) -> ValidationResult<CardExpiry> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "expiry_date".to_string(),
        });
    }

    let expiry = parse_expiry(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: "expiry_date".to_string(),
        reason: "must be in MM/YY format".to_string(),
    })?;

    if !(1..=12).contains(&expiry.month) {
        return Err(ValidationError::OutOfRange {
            field: "expiry_date month".to_string(),
            min: 1,
            max: 12,
        });
    }

    let current_year = today.year().rem_euclid(100) as u32;
    let current_month = today.month();

    if expiry.year < current_year || (expiry.year == current_year && expiry.month < current_month)
    {
        return Err(ValidationError::Expired {
            field: "expiry_date".to_string(),
        });
    }

    if expiry.year > current_year + MAX_EXPIRY_YEARS_AHEAD {
        return Err(ValidationError::TooFarInFuture {
            field: "expiry_date".to_string(),
            max_years: MAX_EXPIRY_YEARS_AHEAD,
        });
    }

    Ok(expiry)
}

fn parse_expiry(raw: &str) -> Option<CardExpiry> {
    let (month, year) = raw.split_once('/')?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return None;
    }

    Some(CardExpiry {
        month: month.parse().ok()?,
        year: year.parse().ok()?,
    })
}

// =============================================================================
// Cardholder Name
// =============================================================================

/// Validates the name printed on the card.
///
/// ## Rules
/// - Trimmed before checking
/// - 2 to 50 characters
/// - Letters (accented included) and spaces only
pub fn validate_cardholder_name(raw: &str) -> ValidationResult<()> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "cardholder_name".to_string(),
        });
    }

    let len = name.chars().count();
    if len < CARDHOLDER_MIN_CHARS {
        return Err(ValidationError::TooShort {
            field: "cardholder_name".to_string(),
            min: CARDHOLDER_MIN_CHARS,
        });
    }
    if len > CARDHOLDER_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "cardholder_name".to_string(),
            max: CARDHOLDER_MAX_CHARS,
        });
    }

    if !name.chars().all(|c| is_name_letter(c) || c == ' ') {
        return Err(ValidationError::InvalidFormat {
            field: "cardholder_name".to_string(),
            reason: "must contain only letters and spaces".to_string(),
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
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    /// Appends the digit that makes `body` pass the Luhn check.
    fn with_check_digit(body: &str) -> String {
        (0..10)
            .map(|d| format!("{body}{d}"))
            .find(|candidate| luhn_checksum_valid(candidate))
            .unwrap()
    }

    #[test]
    fn test_luhn_known_values() {
        assert!(luhn_checksum_valid("79927398713"));
        assert!(luhn_checksum_valid("4539148803436467"));
        assert!(luhn_checksum_valid("4111111111111111"));
        assert!(luhn_checksum_valid("378282246310005"));

        assert!(!luhn_checksum_valid("4111111111111112"));
        assert!(!luhn_checksum_valid(""));
        assert!(!luhn_checksum_valid("4111a11111111111"));
    }

    #[test]
    fn test_validate_card_number() {
        assert_eq!(
            validate_card_number("4111 1111 1111 1111").unwrap(),
            "4111111111111111"
        );
        assert!(validate_card_number("378282246310005").is_ok());

        assert!(matches!(
            validate_card_number("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_card_number("4111-1111-1111-1111"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        // Luhn-valid but only 11 digits.
        assert!(matches!(
            validate_card_number("79927398713"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_card_number("4111111111111112"),
            Err(ValidationError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_expiry_date() {
        assert_eq!(
            validate_expiry_date("08/27", today()).unwrap(),
            CardExpiry { month: 8, year: 27 }
        );
        assert!(validate_expiry_date("06/25", today()).is_ok());
        assert!(validate_expiry_date("12/45", today()).is_ok());

        assert!(matches!(
            validate_expiry_date("01/20", today()),
            Err(ValidationError::Expired { .. })
        ));
        assert!(matches!(
            validate_expiry_date("05/25", today()),
            Err(ValidationError::Expired { .. })
        ));
        assert!(matches!(
            validate_expiry_date("13/30", today()),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_expiry_date("00/30", today()),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_expiry_date("01/46", today()),
            Err(ValidationError::TooFarInFuture { .. })
        ));
        assert!(matches!(
            validate_expiry_date("", today()),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_expiry_format_is_strict() {
        for raw in ["8/27", "08/2027", "0827", "08-27", "ab/cd", "08/ 7"] {
            assert!(
                matches!(
                    validate_expiry_date(raw, today()),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{raw} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_validate_cardholder_name() {
        assert!(validate_cardholder_name("María López").is_ok());
        assert!(validate_cardholder_name("  Jo  ").is_ok());

        assert!(validate_cardholder_name("").is_err());
        assert!(validate_cardholder_name("J").is_err());
        assert!(validate_cardholder_name(&"a".repeat(51)).is_err());
        assert!(validate_cardholder_name("John Smith 3rd").is_err());
        assert!(validate_cardholder_name("O'Brien").is_err());
    }

    proptest! {
        #[test]
        fn prop_luhn_valid_numbers_pass(body in "[0-9]{12,18}") {
            let number = with_check_digit(&body);
            prop_assert!(validate_card_number(&number).is_ok());
        }

        #[test]
        fn prop_whitespace_is_ignored(body in "[0-9]{15}") {
            let number = with_check_digit(&body);
            let spaced: String = number
                .chars()
                .enumerate()
                .flat_map(|(i, c)| {
                    let sep = if i > 0 && i % 4 == 0 { Some(' ') } else { None };
                    sep.into_iter().chain(std::iter::once(c))
                })
                .collect();
            prop_assert_eq!(validate_card_number(&spaced), Ok(number));
        }

        #[test]
        fn prop_single_digit_change_breaks_checksum(body in "[0-9]{15}", pos in 0usize..16, bump in 1u32..10) {
            let number = with_check_digit(&body);
            let mut digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
            digits[pos] = (digits[pos] + bump) % 10;
            let mutated: String = digits.iter().filter_map(|d| char::from_digit(*d, 10)).collect();
            prop_assert!(!luhn_checksum_valid(&mutated));
        }
    }
}
