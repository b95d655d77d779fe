//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Order total 21.6, subtotal 20, tax 20 × 0.08:                          │
//! │    20 + 1.6000000000000001 ≠ 21.6        ❌ breakdown drifts            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    2000 + 160 = 2160                     ✅ breakdown sums exactly      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store API sends decimals (JSON numbers, or strings for DECIMAL
//! columns). They are converted to cents once, at the boundary, through
//! [`Money::from_decimal_str`], [`Money::from_decimal`] or the [`decimal`]
//! serde adapter.
//!
//! Amounts that came off the wire are combined with the `checked_*`
//! methods; the operators are for values the caller already bounds.
//!
//! ## Usage
//! ```rust
//! use tiendas_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let doubled = price * 2;
//! assert_eq!(doubled.cents(), 2198);
//!
//! let parsed = Money::from_decimal_str("21.6").unwrap();
//! assert_eq!(parsed.cents(), 2160);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: the reconstructed commission can go negative when an
///   order's stored total is inconsistent with its items
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal string such as `"21.6"`, `"21.60"` or `"-3"`.
    ///
    /// Digits past the second decimal place are rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_str("25.6").unwrap().cents(), 2560);
    /// assert_eq!(Money::from_decimal_str(" 10 ").unwrap().cents(), 1000);
    /// assert_eq!(Money::from_decimal_str("0.125").unwrap().cents(), 13);
    /// assert!(Money::from_decimal_str("12,50").is_err());
    /// ```
    pub fn from_decimal_str(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidAmount {
            value: raw.to_string(),
        };

        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|w| w.checked_mul(100))
                .ok_or_else(invalid)?
        };

        let digits: Vec<i64> = fraction
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(i64::from)
            .collect();
        let mut fraction_cents = digits.first().copied().unwrap_or(0) * 10
            + digits.get(1).copied().unwrap_or(0);
        if digits.get(2).copied().unwrap_or(0) >= 5 {
            fraction_cents += 1;
        }

        let cents = whole_cents
            .checked_add(fraction_cents)
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Converts a JSON-style float amount into cents, rounding to the
    /// nearest cent.
    ///
    /// Only use this at the API boundary; arithmetic stays in cents.
    /// Values whose cent amount does not fit in an `i64` are rejected
    /// rather than clamped.
    pub fn from_decimal(value: f64) -> Result<Self, CoreError> {
        let cents = (value * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return Err(CoreError::InvalidAmount {
                value: value.to_string(),
            });
        }
        Ok(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * rate + 5000) / 10000`, widened to i128 so
    /// large totals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tiendas_core::money::Money;
    /// use tiendas_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2000);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 160);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtracts `other`, `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats the amount as a plain decimal (`"21.60"`), the shape the
    /// store API expects in request bodies.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with a currency sign, for logs and the CLI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_decimal_str(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Serde Adapter for API Decimals
// =============================================================================

/// Serde adapter for amounts that travel as decimals on the wire.
///
/// Accepts a JSON number (`21.6`) or a decimal string (`"21.60"`, as MySQL
/// DECIMAL columns are serialized) and serializes back as a number.
///
/// ```rust
/// use serde::Deserialize;
/// use tiendas_core::money::{self, Money};
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(with = "money::decimal")]
///     total: Money,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"total":"25.60"}"#).unwrap();
/// assert_eq!(row.total.cents(), 2560);
/// ```
pub mod decimal {
    use super::Money;
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.cents() as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as a number or string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom("amount out of range"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            i64::try_from(v)
                .map_err(|_| E::custom("amount out of range"))
                .and_then(|v| self.visit_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            Money::from_decimal(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::from_decimal_str(v).map_err(E::custom)
        }
    }

    /// Same as the parent adapter, but negative amounts are rejected.
    /// Used for unit prices, which the store never stores below zero.
    pub mod non_negative {
        use super::super::Money;
        use serde::de::Error as _;
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
            super::serialize(value, serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
            let money = super::deserialize(deserializer)?;
            if money.is_negative() {
                return Err(D::Error::custom(format!(
                    "amount {} cannot be negative",
                    money.to_decimal_string()
                )));
            }
            Ok(money)
        }
    }

    /// Same as the parent adapter, for optional amounts (`null` → `None`).
    pub mod option {
        use super::super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(money) => super::serialize(money, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] Money);

            Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(m)| m))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(2160).to_decimal_string(), "21.60");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_parse_decimal_str() {
        assert_eq!(Money::from_decimal_str("21.6").unwrap().cents(), 2160);
        assert_eq!(Money::from_decimal_str("21.60").unwrap().cents(), 2160);
        assert_eq!(Money::from_decimal_str("21").unwrap().cents(), 2100);
        assert_eq!(Money::from_decimal_str(".5").unwrap().cents(), 50);
        assert_eq!(Money::from_decimal_str("-3.25").unwrap().cents(), -325);
        assert_eq!(Money::from_decimal_str("1.005").unwrap().cents(), 101);
        assert_eq!(Money::from_decimal_str("1.004").unwrap().cents(), 100);

        assert!(Money::from_decimal_str("").is_err());
        assert!(Money::from_decimal_str(".").is_err());
        assert!(Money::from_decimal_str("abc").is_err());
        assert!(Money::from_decimal_str("1.2.3").is_err());
        assert!(Money::from_decimal_str("1e3").is_err());
    }

    #[test]
    fn test_from_decimal_float() {
        assert_eq!(Money::from_decimal(21.6).unwrap().cents(), 2160);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
        assert!(Money::from_decimal(f64::NAN).is_err());
    }

    #[test]
    fn test_from_decimal_rejects_out_of_range() {
        assert!(Money::from_decimal(1e17).is_err());
        assert!(Money::from_decimal(-1e17).is_err());
        assert!(Money::from_decimal(f64::INFINITY).is_err());
        assert_eq!(Money::from_decimal(9e15).unwrap().cents(), 900_000_000_000_000_000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert!(big.checked_multiply_quantity(2).is_none());
        assert!(big.checked_add(big).is_none());
        assert!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)).is_none());

        let price = Money::from_cents(299);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
        assert_eq!(price.checked_add(price), Some(Money::from_cents(598)));
        assert_eq!(price.checked_sub(price), Some(Money::zero()));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_order_tax_rate() {
        let subtotal = Money::from_cents(2000);
        let tax = subtotal.calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 160);

        // 12.34 * 8% = 0.9872 → 0.99
        let tax = Money::from_cents(1234).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 99);
    }

    #[test]
    fn test_decimal_serde_adapter() {
        #[derive(Serialize, Deserialize)]
        struct Row {
            #[serde(with = "decimal")]
            total: Money,
            #[serde(with = "decimal::option", default)]
            shipping: Option<Money>,
        }

        let row: Row = serde_json::from_str(r#"{"total":21.6,"shipping":"4.00"}"#).unwrap();
        assert_eq!(row.total.cents(), 2160);
        assert_eq!(row.shipping.map(|m| m.cents()), Some(400));

        let row: Row = serde_json::from_str(r#"{"total":10,"shipping":null}"#).unwrap();
        assert_eq!(row.total.cents(), 1000);
        assert!(row.shipping.is_none());

        let row: Row = serde_json::from_str(r#"{"total":"7.5"}"#).unwrap();
        assert!(row.shipping.is_none());

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["total"], serde_json::json!(7.5));
    }

    #[test]
    fn test_non_negative_adapter() {
        #[derive(Deserialize)]
        struct Line {
            #[serde(with = "decimal::non_negative")]
            price: Money,
        }

        let line: Line = serde_json::from_str(r#"{"price":"0"}"#).unwrap();
        assert!(line.price.is_zero());
        assert!(serde_json::from_str::<Line>(r#"{"price":"-3"}"#).is_err());
        assert!(serde_json::from_str::<Line>(r#"{"price":-0.5}"#).is_err());
    }
}
