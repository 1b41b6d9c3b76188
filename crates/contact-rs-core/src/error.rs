//! Core error types for contact-rs.
//!
//! Two classes of failure exist in the submission pipeline. Validation
//! failures are expected and field-scoped; they are represented by
//! [`ValidationError`]. Everything that can go wrong at the submission
//! boundary (transport, timeouts, bad responses, explicit rejections) is a
//! [`ContactError`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists).
///
/// # Examples
///
/// ```
/// use contact_rs_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("This field is required.", "required");
///
/// // Field-level validation errors
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "email".to_string(),
///     vec![ValidationError::new("Please enter a valid email address", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the messages recorded for `field`, if any.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.field_errors
            .get(field)
            .map(|errors| errors.iter().map(|e| e.message.as_str()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            // Sorted so the rendering is stable across runs.
            let mut fields: Vec<_> = self.field_errors.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            let mut first = true;
            for (field, errors) in fields {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for contact-rs.
///
/// Submission-boundary variants (`Transport`, `Timeout`, `HttpStatus`,
/// `InvalidResponse`, `Rejected`) all lead the controller into its error
/// state. Their text is diagnostic only and is never shown to the user.
#[derive(Error, Debug)]
pub enum ContactError {
    // ── Submission boundary ──────────────────────────────────────────

    /// The request could not be delivered (connection refused, DNS, TLS...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote call did not complete within the allowed time.
    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-2xx status.
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// The endpoint answered with a body that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The endpoint processed the request and reported `success: false`.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ContactError {
    /// Returns `true` for failures where an identical retry may succeed.
    ///
    /// The pipeline never retries on its own; this classification is for
    /// diagnostics and for embedding applications.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::HttpStatus(status) => *status >= 500,
            Self::InvalidResponse(_)
            | Self::Rejected(_)
            | Self::Validation(_)
            | Self::ConfigurationError(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => false,
        }
    }

    /// Returns `true` if this error happened at the submission boundary.
    pub const fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Timeout(_)
                | Self::HttpStatus(_)
                | Self::InvalidResponse(_)
                | Self::Rejected(_)
        )
    }
}

impl From<ValidationError> for ContactError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, ContactError>`.
pub type ContactResult<T> = Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "email".to_string(),
            vec![ValidationError::new("Invalid email.", "invalid")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert!(err.to_string().contains("email: Invalid email."));
    }

    #[test]
    fn test_validation_error_display_is_sorted() {
        let mut field_errors = HashMap::new();
        field_errors.insert("phone".to_string(), vec![ValidationError::new("p", "invalid")]);
        field_errors.insert("email".to_string(), vec![ValidationError::new("e", "invalid")]);
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(err.to_string(), "email: e; phone: p");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "min_length").with_param("min", "2");
        assert_eq!(err.params.get("min").unwrap(), "2");
    }

    #[test]
    fn test_messages_for() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "name".to_string(),
            vec![ValidationError::new("Too short.", "min_length")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(err.messages_for("name"), vec!["Too short."]);
        assert!(err.messages_for("email").is_empty());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ContactError::Transport("refused".into()).is_retryable());
        assert!(ContactError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(ContactError::HttpStatus(503).is_retryable());
        assert!(!ContactError::HttpStatus(404).is_retryable());
        assert!(!ContactError::Rejected("no".into()).is_retryable());
        assert!(!ContactError::InvalidResponse("html".into()).is_retryable());
    }

    #[test]
    fn test_submission_failure_classification() {
        assert!(ContactError::Rejected("x".into()).is_submission_failure());
        assert!(ContactError::HttpStatus(500).is_submission_failure());
        assert!(!ContactError::ConfigurationError("x".into()).is_submission_failure());
        assert!(
            !ContactError::Validation(ValidationError::new("x", "y")).is_submission_failure()
        );
    }

    #[test]
    fn test_contact_error_display() {
        let err = ContactError::Rejected("mailbox full".into());
        assert_eq!(err.to_string(), "Submission rejected: mailbox full");
        let err = ContactError::HttpStatus(502);
        assert_eq!(err.to_string(), "Unexpected HTTP status: 502");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ContactError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: ContactError = ValidationError::new("bad", "invalid").into();
        assert!(matches!(err, ContactError::Validation(_)));
    }
}
