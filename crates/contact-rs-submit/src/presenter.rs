//! Rendering of validation errors and submission outcomes.
//!
//! [`FeedbackPresenter`] drives two independent surfaces:
//!
//! 1. Field-level: after every validation pass each field either shows its
//!    error or has any previous error cleared.
//! 2. Form-level: a single transient banner. The presenter owns the task
//!    that hides it after the expiry interval; showing another banner or
//!    clearing it cancels that task.
//!
//! Expiry tasks are spawned on the current tokio runtime, so banners must be
//! shown from within one.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use contact_rs_forms::ValidationResult;

use crate::surface::{BannerKind, BannerView, FieldErrorView};

/// Renders feedback onto the injected views.
pub struct FeedbackPresenter {
    field_view: Arc<dyn FieldErrorView>,
    banner_view: Arc<dyn BannerView>,
    expiry: Duration,
    pending_expiry: Mutex<Option<JoinHandle<()>>>,
}

impl FeedbackPresenter {
    /// Creates a presenter whose banners disappear after `expiry`.
    pub fn new(
        field_view: Arc<dyn FieldErrorView>,
        banner_view: Arc<dyn BannerView>,
        expiry: Duration,
    ) -> Self {
        Self {
            field_view,
            banner_view,
            expiry,
            pending_expiry: Mutex::new(None),
        }
    }

    /// How long a banner stays up.
    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Shows the error of every failed field and clears every other field.
    pub fn render_validation(&self, result: &ValidationResult) {
        for (field, error) in result.iter() {
            match error {
                Some(message) => self.field_view.show_error(field, message),
                None => self.field_view.clear_error(field),
            }
        }
    }

    /// Shows the outcome banner and schedules its removal.
    ///
    /// Any banner still pending expiry is replaced. When the new banner
    /// expires it is cleared and `on_expire` runs; if the banner is replaced
    /// or cleared first, `on_expire` never runs.
    pub fn show_outcome<F>(&self, kind: BannerKind, message: &str, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        self.banner_view.show(kind, message);

        let banner_view = Arc::clone(&self.banner_view);
        let expiry = self.expiry;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(expiry).await;
            banner_view.clear();
            tracing::trace!(kind = %kind, "feedback banner expired");
            on_expire();
        }));
    }

    /// Cancels any pending expiry and hides the banner now.
    pub fn clear_transient(&self) {
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
        self.banner_view.clear();
    }

    /// Returns `true` while a shown banner is waiting to expire.
    pub fn has_pending_expiry(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending_expiry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FeedbackPresenter {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for FeedbackPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackPresenter")
            .field("expiry", &self.expiry)
            .field("pending_expiry", &self.has_pending_expiry())
            .finish_non_exhaustive()
    }
}
