//! # contact-rs-forms
//!
//! The data side of the contact form: the five captured values
//! ([`FieldSet`]) and the pure validation pass over them
//! ([`validate`](validation::validate) producing a [`ValidationResult`]).
//!
//! Nothing in this crate touches an interface or performs I/O, so every rule
//! can be tested in isolation.

pub mod fields;
pub mod validation;

pub use fields::{FieldName, FieldSet};
pub use validation::{validate, ValidationResult};
