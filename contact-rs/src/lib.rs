//! # contact-rs
//!
//! Client-side contact form pipeline for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates and adds
//! [`ContactForm`], which wires one form surface to a submission backend
//! chosen by [`ContactSettings`](core::ContactSettings).
//!
//! ```rust,no_run
//! use contact_rs::core::{logging, settings_loader};
//! use contact_rs::submit::MemoryForm;
//! use contact_rs::ContactForm;
//!
//! async fn example() -> contact_rs::core::ContactResult<()> {
//!     let settings = settings_loader::from_env()?;
//!     logging::setup_logging(&settings);
//!
//!     let surface = MemoryForm::new();
//!     let form = ContactForm::new(settings, surface.clone())?;
//!     let report = form.submit().await;
//!     println!("{report:?}, banner: {:?}", surface.banner());
//!     Ok(())
//! }
//! ```

pub mod form;

pub use form::{ContactForm, ContactSurface};

/// Error types, settings, settings loading, and logging setup.
pub use contact_rs_core as core;

/// Field names, field sets, and validation rules.
pub use contact_rs_forms as forms;

/// Submission controller, remote clients, presenter, and surface traits.
pub use contact_rs_submit as submit;

/// Scripted client and live stub endpoint for tests.
#[cfg(feature = "testing")]
pub use contact_rs_test as test;
