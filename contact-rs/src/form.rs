//! The composition root.
//!
//! [`ContactForm`] builds a [`FeedbackPresenter`] and a
//! [`SubmissionController`] around one surface that implements every
//! capability, and a remote client selected by the settings.

use std::sync::Arc;

use contact_rs_core::{ContactResult, ContactSettings};
use contact_rs_submit::{
    client_from_settings, BannerView, ControllerConfig, FeedbackPresenter, FieldAccess,
    FieldErrorView, RemoteSubmissionClient, SubmissionController, SubmissionState, SubmitReport,
    TriggerControl,
};

/// A surface providing all four capabilities the pipeline needs.
///
/// Implemented automatically for any type that implements
/// [`FieldAccess`], [`TriggerControl`], [`FieldErrorView`], and
/// [`BannerView`].
pub trait ContactSurface: FieldAccess + TriggerControl + FieldErrorView + BannerView + 'static {}

impl<T> ContactSurface for T where
    T: FieldAccess + TriggerControl + FieldErrorView + BannerView + 'static
{
}

/// One contact form wired to its submission backend.
#[derive(Debug)]
pub struct ContactForm {
    controller: SubmissionController,
    settings: ContactSettings,
}

impl ContactForm {
    /// Wires `surface` to the backend named by `settings.submission_backend`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::ConfigurationError`](contact_rs_core::ContactError::ConfigurationError)
    /// if the settings are invalid or the backend cannot be built.
    pub fn new<S: ContactSurface>(settings: ContactSettings, surface: S) -> ContactResult<Self> {
        let client = client_from_settings(&settings)?;
        Ok(Self::with_client(settings, surface, client))
    }

    /// Wires `surface` to an explicit client, ignoring the configured backend.
    pub fn with_client<S: ContactSurface>(
        settings: ContactSettings,
        surface: S,
        client: Arc<dyn RemoteSubmissionClient>,
    ) -> Self {
        let surface = Arc::new(surface);
        let presenter = FeedbackPresenter::new(
            Arc::clone(&surface) as Arc<dyn FieldErrorView>,
            Arc::clone(&surface) as Arc<dyn BannerView>,
            settings.feedback_expiry(),
        );
        let controller = SubmissionController::new(
            Arc::clone(&surface) as Arc<dyn FieldAccess>,
            surface as Arc<dyn TriggerControl>,
            client,
            presenter,
            ControllerConfig::from_settings(&settings),
        );
        tracing::debug!(
            backend = %settings.submission_backend,
            expiry_ms = settings.feedback_expiry_ms,
            "contact form ready"
        );
        Self {
            controller,
            settings,
        }
    }

    /// Handles one submit event.
    pub async fn submit(&self) -> SubmitReport {
        self.controller.submit().await
    }

    /// The controller's current state.
    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// The underlying controller.
    pub const fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    /// The settings this form was built from.
    pub const fn settings(&self) -> &ContactSettings {
        &self.settings
    }
}
