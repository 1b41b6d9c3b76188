//! Pure validation of a contact [`FieldSet`].
//!
//! [`validate`] runs one rule per field and accumulates every failure rather
//! than short-circuiting, so a single pass reports all problems at once.
//! Values are trimmed before checking. Lengths are counted in UTF-16 code
//! units, so a character outside the Basic Multilingual Plane counts twice.
//!
//! | field | rule |
//! |---|---|
//! | name | at least 2 characters |
//! | email | `local@domain.tld`, no whitespace, exactly one `@` per part |
//! | phone | digits, spaces, `-`, `+`, `(`, `)` only, at least 10 characters |
//! | service | non-empty |
//! | message | at least 10 characters |

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use contact_rs_core::ValidationError;

use crate::fields::{FieldName, FieldSet};

const NAME_MIN_UNITS: usize = 2;
const MESSAGE_MIN_UNITS: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s\-+()]{10,}$").expect("valid regex"));

/// Returns the fixed message shown when `field` fails its rule.
pub const fn error_message(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Please enter a valid name (at least 2 characters)",
        FieldName::Email => "Please enter a valid email address",
        FieldName::Phone => "Please enter a valid phone number",
        FieldName::Service => "Please select a service type",
        FieldName::Message => "Please enter a message (at least 10 characters)",
    }
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Checks a single field. `value` is trimmed before the rule applies.
///
/// Returns the field's error message, or `None` if the value is acceptable.
pub fn check_field(field: FieldName, value: &str) -> Option<&'static str> {
    let value = value.trim();
    let ok = match field {
        FieldName::Name => utf16_len(value) >= NAME_MIN_UNITS,
        FieldName::Email => !value.is_empty() && EMAIL_RE.is_match(value),
        FieldName::Phone => !value.is_empty() && PHONE_RE.is_match(value),
        FieldName::Service => !value.is_empty(),
        FieldName::Message => utf16_len(value) >= MESSAGE_MIN_UNITS,
    };
    if ok {
        None
    } else {
        Some(error_message(field))
    }
}

/// Validates every field of `fields`.
///
/// Deterministic and free of side effects: the same input always yields the
/// same [`ValidationResult`].
///
/// # Examples
///
/// ```
/// use contact_rs_forms::{validate, FieldName, FieldSet};
///
/// let result = validate(&FieldSet::new(
///     "Al",
///     "a@b.co",
///     "555-123-4567",
///     "consulting",
///     "Hello, this is long enough.",
/// ));
/// assert!(result.is_valid());
///
/// let result = validate(&FieldSet::default());
/// assert_eq!(result.error_count(), 5);
/// assert_eq!(
///     result.error(FieldName::Service),
///     Some("Please select a service type")
/// );
/// ```
pub fn validate(fields: &FieldSet) -> ValidationResult {
    let errors = fields
        .iter()
        .filter_map(|(field, value)| check_field(field, value).map(|msg| (field, msg)))
        .collect();
    ValidationResult { errors }
}

/// The outcome of one validation pass.
///
/// Maps each field to an optional error message; a field without an entry is
/// valid. Validity is always derived from the map and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: BTreeMap<FieldName, &'static str>,
}

impl ValidationResult {
    /// Returns `true` iff no field produced an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the error message for `field`, if it failed.
    pub fn error(&self, field: FieldName) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Returns `true` if `field` failed.
    pub fn has_error(&self, field: FieldName) -> bool {
        self.errors.contains_key(&field)
    }

    /// Returns the number of failed fields.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over every field in form order with its optional error.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, Option<&'static str>)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |field| (field, self.error(field)))
    }

    /// Iterates over the failed fields only.
    pub fn invalid_fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.errors.keys().copied()
    }

    /// Converts the pass into a `Result` carrying per-field errors.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with one entry per failed field.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid() {
            return Ok(());
        }
        let field_errors: HashMap<String, Vec<ValidationError>> = self
            .errors
            .into_iter()
            .map(|(field, msg)| {
                (
                    field.as_str().to_string(),
                    vec![ValidationError::new(msg, "invalid")],
                )
            })
            .collect();
        Err(ValidationError::with_field_errors(field_errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FieldSet {
        FieldSet::new(
            "Al",
            "a@b.co",
            "555-123-4567",
            "consulting",
            "Hello, this is long enough.",
        )
    }

    #[test]
    fn test_valid_field_set() {
        let result = validate(&valid());
        assert!(result.is_valid());
        assert_eq!(result.error_count(), 0);
        assert!(result.iter().all(|(_, err)| err.is_none()));
    }

    #[test]
    fn test_all_fields_invalid() {
        let result = validate(&FieldSet::new("A", "bad", "123", "", "short"));
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 5);
        for field in FieldName::ALL {
            assert_eq!(result.error(field), Some(error_message(field)));
        }
    }

    #[test]
    fn test_single_failure_leaves_others_untouched() {
        for field in FieldName::ALL {
            let fields = valid().with(field, "");
            let result = validate(&fields);
            assert!(!result.is_valid(), "{field} should invalidate the form");
            assert_eq!(result.invalid_fields().collect::<Vec<_>>(), vec![field]);
        }
    }

    #[test]
    fn test_deterministic() {
        let fields = FieldSet::new("A", "a@b.co", "", "x", "too short");
        assert_eq!(validate(&fields), validate(&fields));
    }

    #[test]
    fn test_name_rules() {
        assert!(check_field(FieldName::Name, "Al").is_none());
        assert!(check_field(FieldName::Name, "A").is_some());
        assert!(check_field(FieldName::Name, "   A   ").is_some());
        assert!(check_field(FieldName::Name, "").is_some());
        // Counts UTF-16 units, not bytes.
        assert!(check_field(FieldName::Name, "é").is_some());
        assert!(check_field(FieldName::Name, "Zoë").is_none());
    }

    #[test]
    fn test_astral_characters_count_twice() {
        assert!(check_field(FieldName::Name, "😀").is_none());
        assert!(check_field(FieldName::Message, "😀😀😀😀😀").is_none());
        assert!(check_field(FieldName::Message, "😀😀😀😀").is_some());
    }

    #[test]
    fn test_email_rules() {
        assert!(check_field(FieldName::Email, "a@b.co").is_none());
        assert!(check_field(FieldName::Email, " user@mail.example.org ").is_none());
        assert!(check_field(FieldName::Email, "bad").is_some());
        assert!(check_field(FieldName::Email, "a@b").is_some());
        assert!(check_field(FieldName::Email, "a b@c.d").is_some());
        assert!(check_field(FieldName::Email, "a@@b.c").is_some());
        assert!(check_field(FieldName::Email, "@b.c").is_some());
        assert!(check_field(FieldName::Email, "").is_some());
    }

    #[test]
    fn test_phone_rules() {
        assert!(check_field(FieldName::Phone, "555-123-4567").is_none());
        assert!(check_field(FieldName::Phone, "+1 (555) 123 4567").is_none());
        assert!(check_field(FieldName::Phone, "0123456789").is_none());
        assert!(check_field(FieldName::Phone, "123").is_some());
        assert!(check_field(FieldName::Phone, "555-CALL-NOW").is_some());
        assert!(check_field(FieldName::Phone, "         ").is_some());
        assert!(check_field(FieldName::Phone, "").is_some());
    }

    #[test]
    fn test_service_rules() {
        assert!(check_field(FieldName::Service, "consulting").is_none());
        assert!(check_field(FieldName::Service, "").is_some());
        assert!(check_field(FieldName::Service, "  ").is_some());
    }

    #[test]
    fn test_message_rules() {
        assert!(check_field(FieldName::Message, "0123456789").is_none());
        assert!(check_field(FieldName::Message, "short").is_some());
        assert!(check_field(FieldName::Message, "   short    ").is_some());
    }

    #[test]
    fn test_into_result() {
        assert!(validate(&valid()).into_result().is_ok());

        let err = validate(&valid().with(FieldName::Email, "nope"))
            .into_result()
            .unwrap_err();
        assert_eq!(
            err.messages_for("email"),
            vec!["Please enter a valid email address"]
        );
        assert_eq!(err.field_errors.len(), 1);
    }

    #[test]
    fn test_serialize_lists_only_failures() {
        let result = validate(&valid().with(FieldName::Name, "A"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["errors"]["name"],
            "Please enter a valid name (at least 2 characters)"
        );
        assert!(json["errors"].get("email").is_none());
    }
}
