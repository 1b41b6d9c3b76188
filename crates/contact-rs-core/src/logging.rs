//! Logging integration for contact-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`ContactSettings`] and for creating per-attempt spans.

use uuid::Uuid;

use crate::settings::ContactSettings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "contact_rs_submit=trace"). In debug mode a pretty, human-readable format
/// is used; otherwise a structured JSON format is used.
///
/// Installing a subscriber twice is not an error; the second call is ignored.
pub fn setup_logging(settings: &ContactSettings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Returns a fresh identifier for one submission attempt.
pub fn new_attempt_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creates a tracing span for one submission attempt.
///
/// Everything logged while the attempt is validated, sent and reconciled
/// carries the attempt id.
///
/// # Examples
///
/// ```
/// use contact_rs_core::logging::{new_attempt_id, submission_span};
///
/// let span = submission_span(&new_attempt_id());
/// let _guard = span.enter();
/// tracing::info!("validating");
/// ```
pub fn submission_span(attempt_id: &str) -> tracing::Span {
    tracing::info_span!("submission", attempt = attempt_id)
}
