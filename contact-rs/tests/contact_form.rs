//! Composition-root tests: settings in, a working form out.

use std::sync::Arc;
use std::time::Duration;

use contact_rs::core::{ContactError, ContactSettings, SubmissionBackend};
use contact_rs::forms::{FieldName, FieldSet};
use contact_rs::submit::{BannerKind, MemoryForm, SubmissionOutcome, SubmissionState};
use contact_rs::ContactForm;
use contact_rs_test::ScriptedClient;

fn valid_fields() -> FieldSet {
    FieldSet::new(
        "Al",
        "a@b.co",
        "555-123-4567",
        "consulting",
        "Hello, this is long enough.",
    )
}

#[tokio::test(start_paused = true)]
async fn test_simulated_backend_end_to_end() {
    let settings = ContactSettings {
        submission_backend: SubmissionBackend::Simulated,
        ..ContactSettings::default()
    };
    let surface = MemoryForm::new();
    surface.fill(valid_fields());
    let form = ContactForm::new(settings, surface.clone()).unwrap();

    let start = tokio::time::Instant::now();
    assert!(form.submit().await.is_delivered());
    assert!(start.elapsed() >= Duration::from_millis(1_500));
    assert!(surface.fields().is_empty());
    assert_eq!(form.state(), SubmissionState::Success);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(surface.banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_settings_texts_reach_the_surface() {
    let settings = ContactSettings {
        busy_label: "Please wait".to_string(),
        error_message: "Could not send.".to_string(),
        feedback_expiry_ms: 1_000,
        ..ContactSettings::default()
    };
    let surface = MemoryForm::new();
    surface.fill(valid_fields());
    let client = ScriptedClient::with_outcomes([SubmissionOutcome::failed("smtp down")]);
    client.hold();
    let form = ContactForm::with_client(settings, surface.clone(), Arc::new(client.clone()));

    let submit = form.submit();
    let observe = async {
        tokio::task::yield_now().await;
        assert_eq!(surface.trigger_label(), "Please wait");
        client.release();
    };
    let (report, ()) = tokio::join!(submit, observe);

    assert!(matches!(report.error(), Some(ContactError::Rejected(_))));
    let banner = surface.banner().expect("error banner");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.message, "Could not send.");
    assert_eq!(surface.trigger_label(), "Send Message");

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert!(surface.banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_input_never_reaches_client() {
    let surface = MemoryForm::new();
    surface.set_field(FieldName::Email, "not-an-email");
    let client = ScriptedClient::new();
    let form = ContactForm::with_client(
        ContactSettings::default(),
        surface.clone(),
        Arc::new(client.clone()),
    );

    let report = form.submit().await;
    assert_eq!(report.validation().map(|r| r.error_count()), Some(5));
    client.assert_call_count(0);
    assert_eq!(form.state(), SubmissionState::Idle);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = ContactSettings {
        endpoint_url: "ftp://example.com/send".to_string(),
        ..ContactSettings::default()
    };
    let err = ContactForm::new(settings, MemoryForm::new()).unwrap_err();
    assert!(matches!(err, ContactError::ConfigurationError(_)));
}

#[test]
fn test_settings_are_kept() {
    let settings = ContactSettings {
        feedback_expiry_ms: 2_500,
        ..ContactSettings::default()
    };
    let form = ContactForm::new(settings, MemoryForm::new()).unwrap();
    assert_eq!(form.settings().feedback_expiry_ms, 2_500);
    assert_eq!(
        form.controller().presenter().expiry(),
        Duration::from_millis(2_500)
    );
}
