//! Remote submission clients.
//!
//! [`RemoteSubmissionClient`] is the only contract the controller depends on:
//! hand over a [`FieldSet`], get back a [`SubmissionOutcome`] or an error.
//! Both an outcome with `success: false` and an error are failures to the
//! controller; they differ only in diagnostic text.
//!
//! ## Backends
//!
//! - [`HttpSubmissionClient`] - POSTs the field set as JSON to an endpoint
//! - [`SimulatedSubmissionClient`] - Waits a fixed delay and reports success
//!
//! [`client_from_settings`] picks one according to
//! [`ContactSettings::submission_backend`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use contact_rs_core::{ContactError, ContactResult, ContactSettings, SubmissionBackend};
use contact_rs_forms::FieldSet;

/// Diagnostic used when the endpoint reports failure without a reason.
const UNSPECIFIED_FAILURE: &str = "Failed to send email";

/// The endpoint's verdict on one submission.
///
/// Wire shape: `{ "success": bool, "error"?: string }`. A body without a
/// `success` key means failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Whether the endpoint accepted the message.
    #[serde(default)]
    pub success: bool,
    /// The endpoint's reason for refusing, if any.
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SubmissionOutcome {
    /// An accepted submission.
    pub const fn succeeded() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    /// A refused submission with a reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(reason.into()),
        }
    }

    /// Parses an endpoint response body.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidResponse`] if the body is not a JSON
    /// object or its `success` key is not a boolean.
    pub fn from_json_bytes(body: &[u8]) -> ContactResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ContactError::InvalidResponse(format!("Body is not JSON: {e}")))?;
        if !value.is_object() {
            return Err(ContactError::InvalidResponse(format!(
                "Expected a JSON object, got {value}"
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| ContactError::InvalidResponse(format!("Unexpected response shape: {e}")))
    }

    /// Turns a refusal into [`ContactError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Rejected`] carrying the endpoint's reason when
    /// `success` is false.
    pub fn into_result(self) -> ContactResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ContactError::Rejected(
                self.error_message
                    .unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string()),
            ))
        }
    }
}

/// Performs the outbound submission.
///
/// Implementations must be `Send + Sync`; the controller holds one behind an
/// `Arc` and calls it at most once at a time.
#[async_trait]
pub trait RemoteSubmissionClient: Send + Sync {
    /// Sends one field set and reports the endpoint's verdict.
    async fn send(&self, fields: &FieldSet) -> ContactResult<SubmissionOutcome>;

    /// A short name for logs.
    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Sends the field set as a JSON POST.
///
/// Non-2xx responses, non-JSON bodies, transport failures, and client-side
/// timeouts are all reported as errors.
#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpSubmissionClient {
    /// Creates a client posting to `endpoint`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::ConfigurationError`] if the HTTP client cannot
    /// be built.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> ContactResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ContactError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Creates a client from `endpoint_url` and `request_timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::ConfigurationError`] if the HTTP client cannot
    /// be built.
    pub fn from_settings(settings: &ContactSettings) -> ContactResult<Self> {
        Self::new(settings.endpoint_url.trim(), settings.request_timeout())
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: &reqwest::Error) -> ContactError {
        if err.is_timeout() {
            ContactError::Timeout(self.timeout.unwrap_or_default())
        } else if let Some(status) = err.status() {
            ContactError::HttpStatus(status.as_u16())
        } else if err.is_decode() {
            ContactError::InvalidResponse(err.to_string())
        } else {
            ContactError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteSubmissionClient for HttpSubmissionClient {
    async fn send(&self, fields: &FieldSet) -> ContactResult<SubmissionOutcome> {
        tracing::debug!(endpoint = %self.endpoint, "posting contact form");

        let response = self
            .client
            .post(&self.endpoint)
            .json(fields)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        SubmissionOutcome::from_json_bytes(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Pretends to send: waits `delay`, then reports success.
///
/// Useful while developing an interface without a running endpoint.
#[derive(Debug, Clone)]
pub struct SimulatedSubmissionClient {
    delay: Duration,
}

impl SimulatedSubmissionClient {
    /// Creates a client that answers after `delay`.
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmissionClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_500))
    }
}

#[async_trait]
impl RemoteSubmissionClient for SimulatedSubmissionClient {
    async fn send(&self, fields: &FieldSet) -> ContactResult<SubmissionOutcome> {
        tracing::info!(
            service = %fields.service,
            delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            "simulating contact form submission"
        );
        tokio::time::sleep(self.delay).await;
        Ok(SubmissionOutcome::succeeded())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Builds the client selected by `settings.submission_backend`.
///
/// # Errors
///
/// Returns [`ContactError::ConfigurationError`] if the settings do not pass
/// [`ContactSettings::validate`] or the HTTP client cannot be built.
pub fn client_from_settings(
    settings: &ContactSettings,
) -> ContactResult<Arc<dyn RemoteSubmissionClient>> {
    settings.validate()?;
    let client: Arc<dyn RemoteSubmissionClient> = match settings.submission_backend {
        SubmissionBackend::Http => Arc::new(HttpSubmissionClient::from_settings(settings)?),
        SubmissionBackend::Simulated => {
            Arc::new(SimulatedSubmissionClient::new(settings.simulated_delay()))
        }
    };
    tracing::debug!(backend = client.name(), "submission client configured");
    Ok(client)
}
