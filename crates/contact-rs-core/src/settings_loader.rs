//! Settings loading from configuration files.
//!
//! This module provides functions to load [`ContactSettings`] from TOML files,
//! JSON files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CONTACT_DEBUG` | `debug` |
//! | `CONTACT_LOG_LEVEL` | `log_level` |
//! | `CONTACT_SUBMISSION_BACKEND` | `submission_backend` |
//! | `CONTACT_ENDPOINT_URL` | `endpoint_url` |
//! | `CONTACT_REQUEST_TIMEOUT_MS` | `request_timeout_ms` (`0`/`none` disables the bound) |
//! | `CONTACT_FEEDBACK_EXPIRY_MS` | `feedback_expiry_ms` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use contact_rs_core::settings_loader;
//!
//! // Load from TOML
//! let settings = settings_loader::from_toml_file("config/contact.toml").unwrap();
//!
//! // Load from TOML with environment overrides
//! let settings = settings_loader::from_toml_file_with_env("config/contact.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::ContactError;
use crate::settings::{ContactSettings, SubmissionBackend};

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<ContactSettings, ContactError> {
    // Deserialize into a generic value first and merge it over the defaults,
    // so a partial file only overrides what it names.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| ContactError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    let default_json = serde_json::to_value(ContactSettings::default()).map_err(|e| {
        ContactError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        ContactError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<ContactSettings, ContactError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ContactError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the TOML is malformed, or an
/// environment override carries an unknown backend name.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<ContactSettings, ContactError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<ContactSettings, ContactError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ContactError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    let default_json = serde_json::to_value(ContactSettings::default()).map_err(|e| {
        ContactError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        ContactError::ConfigurationError(format!("Failed to deserialize settings from JSON: {e}"))
    })
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<ContactSettings, ContactError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ContactError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the JSON is malformed, or an
/// environment override carries an unknown backend name.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<ContactSettings, ContactError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
///
/// # Errors
///
/// Returns an error if `CONTACT_SUBMISSION_BACKEND` names an unknown backend.
pub fn from_env() -> Result<ContactSettings, ContactError> {
    let mut settings = ContactSettings::default();
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Applies environment variable overrides to a settings struct.
///
/// Supported environment variables:
///
/// - `CONTACT_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `CONTACT_LOG_LEVEL` -> `log_level`
/// - `CONTACT_SUBMISSION_BACKEND` -> `submission_backend` ("http" or "simulated")
/// - `CONTACT_ENDPOINT_URL` -> `endpoint_url`
/// - `CONTACT_REQUEST_TIMEOUT_MS` -> `request_timeout_ms` ("0" or "none" => unbounded)
/// - `CONTACT_FEEDBACK_EXPIRY_MS` -> `feedback_expiry_ms`
///
/// Numeric values that fail to parse are ignored and the previous value kept.
///
/// # Errors
///
/// Returns an error if `CONTACT_SUBMISSION_BACKEND` names an unknown backend.
pub fn apply_env_overrides(settings: &mut ContactSettings) -> Result<(), ContactError> {
    if let Ok(val) = std::env::var("CONTACT_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("CONTACT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("CONTACT_SUBMISSION_BACKEND") {
        settings.submission_backend = val.parse::<SubmissionBackend>()?;
    }

    if let Ok(val) = std::env::var("CONTACT_ENDPOINT_URL") {
        settings.endpoint_url = val;
    }

    if let Ok(val) = std::env::var("CONTACT_REQUEST_TIMEOUT_MS") {
        let val = val.trim().to_lowercase();
        if val == "none" || val == "0" {
            settings.request_timeout_ms = None;
        } else if let Ok(ms) = val.parse::<u64>() {
            settings.request_timeout_ms = Some(ms);
        }
    }

    if let Ok(val) = std::env::var("CONTACT_FEEDBACK_EXPIRY_MS") {
        if let Ok(ms) = val.trim().parse::<u64>() {
            settings.feedback_expiry_ms = ms;
        }
    }

    Ok(())
}

// ============================================================
// Helpers
// ============================================================

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            endpoint_url = "https://mail.example.com/contact"
            debug = false
            feedback_expiry_ms = 8000
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.endpoint_url, "https://mail.example.com/contact");
        assert!(!settings.debug);
        assert_eq!(settings.feedback_expiry_ms, 8000);
        // Defaults preserved
        assert_eq!(settings.busy_label, "Sending...");
        assert_eq!(settings.request_timeout_ms, Some(15_000));
    }

    #[test]
    fn test_from_toml_str_backend() {
        let settings = from_toml_str(r#"submission_backend = "simulated""#).unwrap();
        assert_eq!(settings.submission_backend, SubmissionBackend::Simulated);
    }

    #[test]
    fn test_from_toml_str_unknown_backend() {
        let result = from_toml_str(r#"submission_backend = "carrier-pigeon""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
            [extra]
            campaign = "spring"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.extra["campaign"], "spring");
    }

    #[test]
    fn test_from_toml_str_empty() {
        // Empty TOML should produce defaults
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.endpoint_url, "http://localhost:3000/send-email");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "success_message": "Thanks!",
            "debug": false,
            "log_level": "debug"
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.success_message, "Thanks!");
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        // Defaults preserved
        assert_eq!(settings.error_message, "Failed to send message. Please try again.");
    }

    #[test]
    fn test_from_json_str_null_timeout_is_unbounded() {
        let settings = from_json_str(r#"{"request_timeout_ms": null}"#).unwrap();
        assert_eq!(settings.request_timeout_ms, None);
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.feedback_expiry_ms, 5_000);
    }

    #[test]
    fn test_from_json_str_invalid() {
        let result = from_json_str("{invalid json");
        assert!(result.is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("contact_rs_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test_settings.toml");

        let toml_content = r#"
            endpoint_url = "http://127.0.0.1:9999/send"
            debug = false
        "#;
        std::fs::write(&path, toml_content).unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.endpoint_url, "http://127.0.0.1:9999/send");
        assert!(!settings.debug);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("contact_rs_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test_settings.json");

        let json_content = r#"{"busy_label": "Please wait", "debug": false}"#;
        std::fs::write(&path, json_content).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.busy_label, "Please wait");
        assert!(!settings.debug);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/contact.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/contact.json");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_endpoint() {
        let mut settings = ContactSettings::default();
        std::env::set_var("CONTACT_ENDPOINT_URL", "https://env.example.com/send");
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(settings.endpoint_url, "https://env.example.com/send");
        std::env::remove_var("CONTACT_ENDPOINT_URL");
    }

    #[test]
    fn test_apply_env_overrides_debug() {
        let mut settings = ContactSettings::default();
        settings.debug = false;
        std::env::set_var("CONTACT_DEBUG", "1");
        apply_env_overrides(&mut settings).unwrap();
        assert!(settings.debug);
        std::env::remove_var("CONTACT_DEBUG");
    }

    #[test]
    fn test_apply_env_overrides_timeout() {
        let mut settings = ContactSettings::default();
        std::env::set_var("CONTACT_REQUEST_TIMEOUT_MS", "none");
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(settings.request_timeout_ms, None);

        std::env::set_var("CONTACT_REQUEST_TIMEOUT_MS", "2500");
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(settings.request_timeout_ms, Some(2500));
        std::env::remove_var("CONTACT_REQUEST_TIMEOUT_MS");
    }

    #[test]
    fn test_apply_env_overrides_invalid_expiry() {
        let mut settings = ContactSettings::default();
        std::env::set_var("CONTACT_FEEDBACK_EXPIRY_MS", "soon");
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(settings.feedback_expiry_ms, 5_000); // Should not change
        std::env::remove_var("CONTACT_FEEDBACK_EXPIRY_MS");
    }

    #[test]
    fn test_from_env_backend() {
        std::env::set_var("CONTACT_SUBMISSION_BACKEND", "simulated");
        let settings = from_env().unwrap();
        assert_eq!(settings.submission_backend, SubmissionBackend::Simulated);
        std::env::remove_var("CONTACT_SUBMISSION_BACKEND");
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_basic() {
        let base = serde_json::json!({"a": 1, "b": 2});
        let over = serde_json::json!({"b": 3, "c": 4});
        let merged = merge_json(base, over);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 3);
        assert_eq!(merged["c"], 4);
    }

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }

    // ── Full flow with env ──────────────────────────────────────────

    #[test]
    fn test_toml_with_env_override() {
        let dir = std::env::temp_dir().join("contact_rs_test_toml_env");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings_env.toml");

        let toml_content = r#"
            log_level = "warn"
        "#;
        std::fs::write(&path, toml_content).unwrap();

        std::env::set_var("CONTACT_LOG_LEVEL", "trace");

        let settings = from_toml_file_with_env(&path).unwrap();
        assert_eq!(settings.log_level, "trace");

        std::env::remove_var("CONTACT_LOG_LEVEL");
        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }
}
