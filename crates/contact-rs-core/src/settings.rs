//! Settings for the contact-rs submission pipeline.
//!
//! [`ContactSettings`] holds every tunable of the pipeline with sensible
//! defaults. Settings are plain data: the embedding application loads them
//! (see [`settings_loader`](crate::settings_loader)) and hands them to the
//! components it builds. Nothing in the pipeline reads global state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ContactError;

/// Default submission endpoint.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:3000/send-email";

/// Banner text shown after a successful submission.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Message sent successfully! We will contact you soon.";

/// Banner text shown after any failed submission, whatever the cause.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to send message. Please try again.";

/// Trigger label while a submission is in flight.
pub const DEFAULT_BUSY_LABEL: &str = "Sending...";

/// Which remote submission client implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionBackend {
    /// POST the form as JSON to `endpoint_url`.
    #[default]
    Http,
    /// Wait `simulated_delay_ms` and report success without any I/O.
    Simulated,
}

impl SubmissionBackend {
    /// Returns the configuration name of this backend.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Simulated => "simulated",
        }
    }
}

impl fmt::Display for SubmissionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionBackend {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "simulated" => Ok(Self::Simulated),
            other => Err(ContactError::ConfigurationError(format!(
                "Unknown submission backend '{other}' (expected 'http' or 'simulated')"
            ))),
        }
    }
}

/// The complete set of pipeline settings.
///
/// # Examples
///
/// ```
/// use contact_rs_core::settings::{ContactSettings, SubmissionBackend};
///
/// let settings = ContactSettings::default();
/// assert_eq!(settings.submission_backend, SubmissionBackend::Http);
/// assert_eq!(settings.feedback_expiry().as_secs(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSettings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "contact_rs_submit=debug").
    pub log_level: String,

    // ── Submission ───────────────────────────────────────────────────

    /// Which client implementation performs the submission.
    pub submission_backend: SubmissionBackend,
    /// Endpoint receiving the JSON form body.
    pub endpoint_url: String,
    /// Upper bound on one remote call, in milliseconds. `None` waits forever.
    pub request_timeout_ms: Option<u64>,
    /// Delay used by the simulated backend, in milliseconds.
    pub simulated_delay_ms: u64,

    // ── Feedback ─────────────────────────────────────────────────────

    /// How long a success/error banner stays visible, in milliseconds.
    pub feedback_expiry_ms: u64,
    /// Trigger label while submitting.
    pub busy_label: String,
    /// Banner text after success.
    pub success_message: String,
    /// Banner text after failure.
    pub error_message: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            // Core
            debug: true,
            log_level: "info".to_string(),

            // Submission
            submission_backend: SubmissionBackend::Http,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            request_timeout_ms: Some(15_000),
            simulated_delay_ms: 1_500,

            // Feedback
            feedback_expiry_ms: 5_000,
            busy_label: DEFAULT_BUSY_LABEL.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),

            // Extra
            extra: HashMap::new(),
        }
    }
}

impl ContactSettings {
    /// The bounded wait applied to each remote call, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// The display lifetime of a form-level banner.
    pub const fn feedback_expiry(&self) -> Duration {
        Duration::from_millis(self.feedback_expiry_ms)
    }

    /// The delay of the simulated backend.
    pub const fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Checks the settings for combinations the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::ConfigurationError`] when the http backend has
    /// no usable endpoint, when the request timeout is zero, or when the
    /// feedback expiry is zero.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.submission_backend == SubmissionBackend::Http {
            let endpoint = self.endpoint_url.trim();
            if endpoint.is_empty() {
                return Err(ContactError::ConfigurationError(
                    "endpoint_url must be set for the http backend".to_string(),
                ));
            }
            let parsed = url::Url::parse(endpoint).map_err(|e| {
                ContactError::ConfigurationError(format!("endpoint_url '{endpoint}' is invalid: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
                return Err(ContactError::ConfigurationError(format!(
                    "endpoint_url '{endpoint}' must be an http(s) URL with a host"
                )));
            }
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ContactError::ConfigurationError(
                "request_timeout_ms must be greater than zero (use null or none to wait forever)"
                    .to_string(),
            ));
        }
        if self.feedback_expiry_ms == 0 {
            return Err(ContactError::ConfigurationError(
                "feedback_expiry_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
