//! # contact-rs-core
//!
//! Core types, settings, and error types for the contact-rs workspace.
//! This crate has no workspace dependencies and provides the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Pipeline settings with sensible defaults
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{ContactError, ContactResult, ValidationError};
pub use settings::{ContactSettings, SubmissionBackend};
