//! # Form Validation
//!
//! Runs a set of field rules over a submitted form and collects the
//! failures, keyed by field.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FormData                FormValidator               ValidationErrors   │
//! │  ─────────               ─────────────               ────────────────   │
//! │  card_number: "4111.."   card_number → rule ──ok──►                     │
//! │  expiry_date: "01/20" ─► expiry_date → rule ──err─► expiry_date: "..."  │
//! │  cardholder_name: ""     cardholder  → rule ──err─► cardholder_name: ..│
//! │                                                                         │
//! │  Submit is allowed only when ValidationErrors is empty.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules see only their own field's value, so the result does not depend on
//! the order rules run in. A field missing from the form is validated as
//! [`FieldValue::Empty`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ValidationError;
use crate::payment::{validate_card_number, validate_cardholder_name, validate_expiry_date};
use crate::types::{CatalogRecord, NamedRecord};
use crate::validation::{
    validate_commission, validate_commission_value, validate_email, validate_name,
    validate_unique_name, NameRules, ValidationResult, CATEGORY_NAME, PAYMENT_METHOD_NAME,
    SUBCATEGORY_NAME,
};

/// Field names used by the built-in forms.
pub mod fields {
    pub const NAME: &str = "name";
    pub const COMMISSION: &str = "commission";
    pub const CARD_NUMBER: &str = "card_number";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const CARDHOLDER_NAME: &str = "cardholder_name";
    pub const EMAIL: &str = "email";
}

// =============================================================================
// Form Data
// =============================================================================

/// A raw form input: whatever the widget produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl FieldValue {
    /// The value as text; numbers are rendered, empty is `""`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Empty => Cow::Borrowed(""),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// Field name → raw input for one render of a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    pub fn new() -> Self {
        FormData(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Failing fields only; an absent key means the field is valid.
///
/// Serializes as `{ "field": "message" }`, the shape the form widgets read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(BTreeMap<String, ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(BTreeMap::new())
    }

    /// Records an error for `field` unless one is already recorded.
    pub fn add(&mut self, field: impl Into<String>, error: ValidationError) {
        self.0.entry(field.into()).or_insert(error);
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.get(field)
    }

    /// The message to show next to `field`, if it failed.
    pub fn message(&self, field: &str) -> Option<String> {
        self.0.get(field).map(ToString::to_string)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in self.0.values() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, error) in &self.0 {
            map.serialize_entry(field, &error.to_string())?;
        }
        map.end()
    }
}

// =============================================================================
// Form Validator
// =============================================================================

type Rule = Box<dyn Fn(&FieldValue) -> ValidationResult<()> + Send + Sync>;

struct FieldRule {
    field: String,
    check: Rule,
}

/// An ordered set of field rules.
///
/// ## Example
/// ```rust
/// use tiendas_core::form::{fields, FormData, FormValidator};
///
/// let form = FormData::new()
///     .with(fields::NAME, "Visa")
///     .with(fields::COMMISSION, "150");
///
/// let errors = FormValidator::payment_method().validate(&form);
/// assert!(errors.get(fields::NAME).is_none());
/// assert!(errors.get(fields::COMMISSION).is_some());
/// ```
#[derive(Default)]
pub struct FormValidator {
    rules: Vec<FieldRule>,
}

impl FormValidator {
    pub fn new() -> Self {
        FormValidator { rules: Vec::new() }
    }

    /// Adds a rule for `field`. Several rules may target the same field;
    /// the first failure wins.
    pub fn with_rule<F>(mut self, field: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&FieldValue) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.rules.push(FieldRule {
            field: field.into(),
            check: Box::new(rule),
        });
        self
    }

    /// Adds a name rule with the given bounds under [`fields::NAME`].
    pub fn with_name(self, rules: NameRules) -> Self {
        self.with_rule(fields::NAME, move |value| {
            validate_name(&value.as_text(), &rules)
        })
    }

    /// Rejects a [`fields::NAME`] already used by another record.
    ///
    /// The collection is snapshotted now; reload the validator after the
    /// catalog changes.
    pub fn with_unique_name<R: NamedRecord>(self, existing: &[R], exclude_id: Option<i64>) -> Self {
        let snapshot: Vec<CatalogRecord> = existing
            .iter()
            .map(|r| CatalogRecord {
                id: r.record_id(),
                nombre: r.record_name().to_string(),
            })
            .collect();

        self.with_rule(fields::NAME, move |value| {
            validate_unique_name(&value.as_text(), &snapshot, exclude_id)
        })
    }

    /// Admin form for a payment method: name and commission.
    pub fn payment_method() -> Self {
        FormValidator::new()
            .with_name(PAYMENT_METHOD_NAME)
            .with_rule(fields::COMMISSION, |value| match value {
                FieldValue::Number(n) => validate_commission_value(*n).map(|_| ()),
                other => validate_commission(&other.as_text()).map(|_| ()),
            })
    }

    /// Admin form for a category.
    pub fn category() -> Self {
        FormValidator::new().with_name(CATEGORY_NAME)
    }

    /// Admin form for a subcategory.
    pub fn subcategory() -> Self {
        FormValidator::new().with_name(SUBCATEGORY_NAME)
    }

    /// Checkout card form, with expiry checked against `today`.
    pub fn payment_card(today: NaiveDate) -> Self {
        FormValidator::new()
            .with_rule(fields::CARD_NUMBER, |value| {
                validate_card_number(&value.as_text()).map(|_| ())
            })
            .with_rule(fields::EXPIRY_DATE, move |value| {
                validate_expiry_date(&value.as_text(), today).map(|_| ())
            })
            .with_rule(fields::CARDHOLDER_NAME, |value| {
                validate_cardholder_name(&value.as_text())
            })
    }

    /// Passwordless login form (OTP request).
    pub fn otp_request() -> Self {
        FormValidator::new().with_rule(fields::EMAIL, |value| {
            validate_email(&value.as_text()).map(|_| ())
        })
    }

    /// Runs every rule and returns the failing fields.
    pub fn validate(&self, form: &FormData) -> ValidationErrors {
        let empty = FieldValue::Empty;
        let mut errors = ValidationErrors::new();

        for rule in &self.rules {
            if errors.get(&rule.field).is_some() {
                continue;
            }
            let value = form.get(&rule.field).unwrap_or(&empty);
            if let Err(error) = (rule.check)(value) {
                errors.add(rule.field.clone(), error);
            }
        }

        errors
    }

    /// Re-validates a single field, e.g. on blur.
    pub fn validate_field(&self, field: &str, value: &FieldValue) -> Option<ValidationError> {
        self.rules
            .iter()
            .filter(|rule| rule.field == field)
            .find_map(|rule| (rule.check)(value).err())
    }

    /// Names of the fields this validator covers, in rule order.
    pub fn fields(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.field.as_str()) {
                seen.push(&rule.field);
            }
        }
        seen
    }
}

impl fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidator")
            .field("fields", &self.fields())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_valid_card_form_has_no_errors() {
        let form = FormData::new()
            .with(fields::CARD_NUMBER, "4111 1111 1111 1111")
            .with(fields::EXPIRY_DATE, "08/27")
            .with(fields::CARDHOLDER_NAME, "María López");

        let errors = FormValidator::payment_card(today()).validate(&form);
        assert!(errors.is_valid());
        assert!(errors.clone().into_result().is_ok());
    }

    #[test]
    fn test_only_failing_fields_are_reported() {
        let form = FormData::new()
            .with(fields::CARD_NUMBER, "4111 1111 1111 1111")
            .with(fields::EXPIRY_DATE, "01/20");

        let errors = FormValidator::payment_card(today()).validate(&form);
        assert_eq!(errors.len(), 2);
        assert!(errors.get(fields::CARD_NUMBER).is_none());
        assert!(matches!(
            errors.get(fields::EXPIRY_DATE),
            Some(ValidationError::Expired { .. })
        ));
        // Missing field is validated as empty.
        assert_eq!(
            errors.message(fields::CARDHOLDER_NAME).as_deref(),
            Some("cardholder_name is required")
        );
    }

    #[test]
    fn test_numeric_commission_input() {
        let validator = FormValidator::payment_method();

        let ok = FormData::new()
            .with(fields::NAME, "Visa")
            .with(fields::COMMISSION, 3.5);
        assert!(validator.validate(&ok).is_valid());

        let bad = FormData::new()
            .with(fields::NAME, "Visa")
            .with(fields::COMMISSION, -1.0);
        assert!(matches!(
            validator.validate(&bad).get(fields::COMMISSION),
            Some(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_unique_name_rule() {
        let existing = vec![CatalogRecord {
            id: 1,
            nombre: "Visa".to_string(),
        }];
        let form = FormData::new()
            .with(fields::NAME, "visa")
            .with(fields::COMMISSION, "2");

        let creating = FormValidator::payment_method().with_unique_name(&existing, None);
        assert!(matches!(
            creating.validate(&form).get(fields::NAME),
            Some(ValidationError::Duplicate { .. })
        ));

        let editing = FormValidator::payment_method().with_unique_name(&existing, Some(1));
        assert!(editing.validate(&form).is_valid());
    }

    #[test]
    fn test_first_failure_per_field_wins() {
        let existing = vec![CatalogRecord {
            id: 1,
            nombre: "x".to_string(),
        }];
        // Format rule runs first and fails; the duplicate rule is skipped.
        let validator = FormValidator::category().with_unique_name(&existing, None);
        let form = FormData::new().with(fields::NAME, "x");
        assert!(matches!(
            validator.validate(&form).get(fields::NAME),
            Some(ValidationError::TooShort { .. })
        ));
    }

    #[test]
    fn test_rule_order_does_not_change_result() {
        let form = FormData::new()
            .with(fields::NAME, "")
            .with(fields::COMMISSION, "abc");

        let forward = FormValidator::new()
            .with_name(PAYMENT_METHOD_NAME)
            .with_rule(fields::COMMISSION, |v| {
                validate_commission(&v.as_text()).map(|_| ())
            });
        let backward = FormValidator::new()
            .with_rule(fields::COMMISSION, |v| {
                validate_commission(&v.as_text()).map(|_| ())
            })
            .with_name(PAYMENT_METHOD_NAME);

        assert_eq!(forward.validate(&form), backward.validate(&form));
    }

    #[test]
    fn test_validate_field() {
        let validator = FormValidator::otp_request();
        assert!(validator
            .validate_field(fields::EMAIL, &"ana@tienda.com".into())
            .is_none());
        assert!(validator
            .validate_field(fields::EMAIL, &"ana".into())
            .is_some());
        assert!(validator
            .validate_field("unknown", &FieldValue::Empty)
            .is_none());
    }

    #[test]
    fn test_errors_serialize_as_messages() {
        let form = FormData::new().with(fields::NAME, "Visa").with(fields::COMMISSION, "150");
        let errors = FormValidator::payment_method().validate(&form);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "commission": "commission must be between 0 and 100" })
        );
    }

    #[test]
    fn test_form_data_deserializes_mixed_inputs() {
        let form: FormData =
            serde_json::from_str(r#"{"name":"Visa","commission":2.5,"extra":null}"#).unwrap();
        assert_eq!(form.get("name"), Some(&FieldValue::Text("Visa".to_string())));
        assert_eq!(form.get("commission"), Some(&FieldValue::Number(2.5)));
        assert_eq!(form.get("extra"), Some(&FieldValue::Empty));
    }

    #[test]
    fn test_validator_fields_listing() {
        let validator = FormValidator::payment_method().with_unique_name(&Vec::<CatalogRecord>::new(), None);
        assert_eq!(validator.fields(), vec![fields::NAME, fields::COMMISSION]);
    }
}
