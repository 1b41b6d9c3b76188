//! The submission state machine.
//!
//! [`SubmissionController`] turns one submit event into at most one remote
//! call and a terminal feedback state:
//!
//! ```text
//!            invalid                 success
//!   Idle ─────────────► Idle    ┌──────────────► Success ─┐
//!    │                          │                         │ banner expires
//!    │ valid                    │   failure / timeout     │ or next submit
//!    └────────► Submitting ─────┴──────────────► Error ───┴──────► Idle
//! ```
//!
//! An attempt claims the controller under one lock, so a second submit
//! while an attempt is running is refused no matter how calls interleave.
//! The lock only guards the check and the state writes. Surface callbacks
//! and the remote call run with it released, so a surface may read
//! [`SubmissionController::state`] from inside a callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;

use contact_rs_core::logging::{new_attempt_id, submission_span};
use contact_rs_core::{ContactError, ContactResult, ContactSettings};
use contact_rs_forms::{validate, FieldSet, ValidationResult};

use crate::client::{RemoteSubmissionClient, SubmissionOutcome};
use crate::presenter::FeedbackPresenter;
use crate::surface::{BannerKind, FieldAccess, TriggerControl};

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    /// Ready for a submit attempt.
    #[default]
    Idle,
    /// A remote call is in flight; further submits are refused.
    Submitting,
    /// The last attempt was accepted; its banner is still showing.
    Success,
    /// The last attempt failed; its banner is still showing.
    Error,
}

impl SubmissionState {
    /// Returns `true` for `Success` and `Error`.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Returns a lowercase name for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one call to [`SubmissionController::submit`] did.
#[derive(Debug)]
pub enum SubmitReport {
    /// Validation failed; field errors are showing and nothing was sent.
    Invalid(ValidationResult),
    /// The endpoint accepted the message.
    Delivered,
    /// The submission failed. The error is the diagnostic cause; the user
    /// only ever sees the generic error banner.
    Failed(ContactError),
    /// A submission was already in flight; this attempt was ignored.
    InFlight,
}

impl SubmitReport {
    /// Returns `true` for [`SubmitReport::Delivered`].
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Returns the validation result of an invalid attempt.
    pub const fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Invalid(result) => Some(result),
            _ => None,
        }
    }

    /// Returns the cause of a failed attempt.
    pub const fn error(&self) -> Option<&ContactError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Texts and limits the controller applies.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Trigger label while submitting.
    pub busy_label: String,
    /// Banner text after success.
    pub success_message: String,
    /// Banner text after any failure.
    pub error_message: String,
    /// Bound on one remote call. `None` waits as long as the client does.
    pub request_timeout: Option<Duration>,
}

impl ControllerConfig {
    /// Takes the controller texts and limits from `settings`.
    pub fn from_settings(settings: &ContactSettings) -> Self {
        Self {
            busy_label: settings.busy_label.clone(),
            success_message: settings.success_message.clone(),
            error_message: settings.error_message.clone(),
            request_timeout: settings.request_timeout(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_settings(&ContactSettings::default())
    }
}

#[derive(Debug, Default)]
struct StateCell {
    state: SubmissionState,
    // Bumped on every submit attempt; expiry callbacks compare against it.
    attempt: u64,
    // Held from the claim until the attempt's feedback is shown.
    busy: bool,
}

type SharedCell = Arc<Mutex<StateCell>>;

fn lock_cell(cell: &SharedCell) -> MutexGuard<'_, StateCell> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Orchestrates validation, submission, and feedback for one form.
pub struct SubmissionController {
    fields: Arc<dyn FieldAccess>,
    trigger: Arc<dyn TriggerControl>,
    client: Arc<dyn RemoteSubmissionClient>,
    presenter: FeedbackPresenter,
    config: ControllerConfig,
    cell: SharedCell,
}

impl SubmissionController {
    /// Creates a controller in the `Idle` state.
    pub fn new(
        fields: Arc<dyn FieldAccess>,
        trigger: Arc<dyn TriggerControl>,
        client: Arc<dyn RemoteSubmissionClient>,
        presenter: FeedbackPresenter,
        config: ControllerConfig,
    ) -> Self {
        Self {
            fields,
            trigger,
            client,
            presenter,
            config,
            cell: Arc::new(Mutex::new(StateCell::default())),
        }
    }

    /// The current state.
    pub fn state(&self) -> SubmissionState {
        lock_cell(&self.cell).state
    }

    /// Returns `true` while a remote call is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    /// The presenter rendering this controller's feedback.
    pub const fn presenter(&self) -> &FeedbackPresenter {
        &self.presenter
    }

    /// The texts and limits in use.
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Runs one submission attempt against the current field values.
    ///
    /// Validation completes, and the trigger is disabled, before the remote
    /// call is issued. If the returned future is dropped while the call is
    /// in flight, the trigger is restored and the controller returns to
    /// `Idle`.
    pub async fn submit(&self) -> SubmitReport {
        let span = submission_span(&new_attempt_id());
        self.run_attempt().instrument(span).await
    }

    async fn run_attempt(&self) -> SubmitReport {
        let Some(attempt) = self.claim() else {
            tracing::debug!("submission already in flight; ignoring submit");
            return SubmitReport::InFlight;
        };

        self.presenter.clear_transient();
        let fields = self.fields.read();
        let result = validate(&fields);
        self.presenter.render_validation(&result);
        if !result.is_valid() {
            tracing::debug!(
                invalid = ?result.invalid_fields().collect::<Vec<_>>(),
                "contact form failed validation"
            );
            lock_cell(&self.cell).busy = false;
            return SubmitReport::Invalid(result);
        }

        lock_cell(&self.cell).state = SubmissionState::Submitting;
        self.trigger.disable(&self.config.busy_label);

        let mut in_flight = InFlightGuard {
            controller: self,
            armed: true,
        };
        let result = self.call_remote(&fields.trimmed()).await;
        in_flight.armed = false;

        let report = self.reconcile(result, attempt);
        lock_cell(&self.cell).busy = false;
        report
    }

    /// Marks the controller busy and starts a new attempt, or returns `None`
    /// if another attempt is still running.
    fn claim(&self) -> Option<u64> {
        let mut cell = lock_cell(&self.cell);
        if cell.busy {
            return None;
        }
        if cell.state.is_terminal() {
            tracing::debug!(previous = %cell.state, "new attempt resets terminal state");
        }
        cell.busy = true;
        cell.attempt += 1;
        cell.state = SubmissionState::Idle;
        Some(cell.attempt)
    }

    async fn call_remote(&self, fields: &FieldSet) -> ContactResult<()> {
        tracing::debug!(client = self.client.name(), "sending contact form");
        let sent = match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.send(fields))
                .await
                .unwrap_or(Err(ContactError::Timeout(limit))),
            None => self.client.send(fields).await,
        };
        sent.and_then(SubmissionOutcome::into_result)
    }

    fn reconcile(&self, result: ContactResult<()>, attempt: u64) -> SubmitReport {
        lock_cell(&self.cell).state = if result.is_ok() {
            SubmissionState::Success
        } else {
            SubmissionState::Error
        };

        match result {
            Ok(()) => {
                self.fields.reset();
                self.trigger.restore();
                self.show_terminal(BannerKind::Success, &self.config.success_message, attempt);
                tracing::info!("contact form delivered");
                SubmitReport::Delivered
            }
            Err(err) => {
                self.trigger.restore();
                self.show_terminal(BannerKind::Error, &self.config.error_message, attempt);
                tracing::warn!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "contact form submission failed"
                );
                SubmitReport::Failed(err)
            }
        }
    }

    fn show_terminal(&self, kind: BannerKind, message: &str, attempt: u64) {
        let cell = Arc::clone(&self.cell);
        self.presenter.show_outcome(kind, message, move || {
            let mut cell = lock_cell(&cell);
            if cell.attempt == attempt && cell.state.is_terminal() {
                cell.state = SubmissionState::Idle;
            }
        });
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("state", &self.state())
            .field("client", &self.client.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Puts the controller back to `Idle` if an attempt is abandoned mid-call.
struct InFlightGuard<'a> {
    controller: &'a SubmissionController,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("submission abandoned before the remote call completed");
            {
                let mut cell = lock_cell(&self.controller.cell);
                cell.state = SubmissionState::Idle;
                cell.busy = false;
            }
            self.controller.trigger.restore();
        }
    }
}
