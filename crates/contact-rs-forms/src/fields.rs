//! Contact form field names and the captured field set.
//!
//! [`FieldName`] enumerates the five inputs of the form in their display
//! order. [`FieldSet`] holds the raw values exactly as the interface captured
//! them; its JSON form is the body sent to the submission endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use contact_rs_core::ContactError;

/// One of the five contact form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    /// The sender's name.
    Name,
    /// The sender's email address.
    Email,
    /// The sender's phone number.
    Phone,
    /// The selected service type.
    Service,
    /// The free-text message.
    Message,
}

impl FieldName {
    /// All fields, in form order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Service,
        Self::Message,
    ];

    /// Returns the wire key (and input id) of this field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Service => "service",
            Self::Message => "message",
        }
    }

    /// Returns the id of the element that displays this field's error.
    pub fn error_id(&self) -> String {
        format!("{}-error", self.as_str())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ContactError::SerializationError(format!("Unknown form field '{s}'")))
    }
}

/// The five raw values captured from the contact form.
///
/// Values are free text. The only normalization ever applied is trimming
/// leading and trailing whitespace ([`FieldSet::trimmed`]).
///
/// # Examples
///
/// ```
/// use contact_rs_forms::{FieldName, FieldSet};
///
/// let fields = FieldSet::default()
///     .with(FieldName::Name, "Ada")
///     .with(FieldName::Email, "ada@example.com");
/// assert_eq!(fields.get(FieldName::Name), "Ada");
/// assert_eq!(fields.get(FieldName::Phone), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// The sender's name.
    #[serde(default)]
    pub name: String,
    /// The sender's email address.
    #[serde(default)]
    pub email: String,
    /// The sender's phone number.
    #[serde(default)]
    pub phone: String,
    /// The selected service type.
    #[serde(default)]
    pub service: String,
    /// The free-text message.
    #[serde(default)]
    pub message: String,
}

impl FieldSet {
    /// Creates a field set from all five values.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            service: service.into(),
            message: message.into(),
        }
    }

    /// Builds a field set from `(key, value)` pairs such as a decoded form
    /// body. Keys that are not form fields are ignored; later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields = Self::default();
        for (key, value) in pairs {
            if let Ok(field) = key.as_ref().parse::<FieldName>() {
                fields.set(field, value);
            }
        }
        fields
    }

    /// Returns the value of `field`.
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Phone => &self.phone,
            FieldName::Service => &self.service,
            FieldName::Message => &self.message,
        }
    }

    /// Replaces the value of `field`.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Phone => &mut self.phone,
            FieldName::Service => &mut self.service,
            FieldName::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns a copy with every value trimmed of surrounding whitespace.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            service: self.service.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Returns `true` if every value is the empty string.
    pub fn is_empty(&self) -> bool {
        FieldName::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Empties every value, as a form reset does.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Iterates over `(field, value)` in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        FieldName::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
