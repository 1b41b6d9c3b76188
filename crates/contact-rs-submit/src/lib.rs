//! # contact-rs-submit
//!
//! The stateful half of the contact form pipeline.
//!
//! - [`surface`] - Capabilities the interface hands to the pipeline, plus an
//!   in-memory implementation
//! - [`client`] - The remote submission contract and its backends
//! - [`presenter`] - Field-level and form-level feedback with banner expiry
//! - [`controller`] - The submission state machine and its re-entrancy guard
//!
//! A submit event enters [`SubmissionController::submit`], which validates
//! the current field set, sends at most one request at a time, and leaves
//! the interface in a terminal feedback state.

pub mod client;
pub mod controller;
pub mod presenter;
pub mod surface;

pub use client::{
    client_from_settings, HttpSubmissionClient, RemoteSubmissionClient, SimulatedSubmissionClient,
    SubmissionOutcome,
};
pub use controller::{ControllerConfig, SubmissionController, SubmissionState, SubmitReport};
pub use presenter::FeedbackPresenter;
pub use surface::{
    Banner, BannerKind, BannerView, FieldAccess, FieldErrorView, MemoryForm, SurfaceEvent,
    TriggerControl,
};
