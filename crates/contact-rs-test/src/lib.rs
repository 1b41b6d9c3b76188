//! # contact-rs-test
//!
//! Testing utilities for contact-rs.
//!
//! - [`scripted`] - A [`RemoteSubmissionClient`](contact_rs_submit::RemoteSubmissionClient)
//!   that replays queued replies and records every call
//! - [`live_endpoint`] - A real HTTP stub endpoint on a random port for
//!   exercising the HTTP backend end to end

pub mod live_endpoint;
pub mod scripted;

pub use live_endpoint::LiveEndpoint;
pub use scripted::ScriptedClient;
