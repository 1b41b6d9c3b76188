//! Scripted submission client for controller tests.
//!
//! [`ScriptedClient`] answers each call with the next queued reply and
//! remembers every field set it was handed. Once the queue is empty it
//! answers with success. It can also hold every call open until the test
//! releases it, which makes the in-flight window observable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use contact_rs_submit::SubmissionOutcome;
//! use contact_rs_test::scripted::ScriptedClient;
//!
//! let client = ScriptedClient::new();
//! client.push_outcome(SubmissionOutcome::failed("mailbox full"));
//! client.push_outcome(SubmissionOutcome::succeeded());
//! assert_eq!(client.pending_replies(), 2);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use contact_rs_core::{ContactError, ContactResult};
use contact_rs_forms::FieldSet;
use contact_rs_submit::{RemoteSubmissionClient, SubmissionOutcome};

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<ContactResult<SubmissionOutcome>>,
    calls: Vec<FieldSet>,
    holding: bool,
}

/// A [`RemoteSubmissionClient`] driven by a queue of replies.
///
/// Cloning shares the queue and the call log, so one clone can be handed to
/// the controller while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<ScriptState>>,
    release: Arc<Notify>,
}

impl ScriptedClient {
    /// Creates a client that answers every call with success.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that replays `outcomes` in order.
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = SubmissionOutcome>) -> Self {
        let client = Self::new();
        for outcome in outcomes {
            client.push_outcome(outcome);
        }
        client
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().expect("ScriptedClient lock poisoned")
    }

    /// Queues an endpoint verdict.
    pub fn push_outcome(&self, outcome: SubmissionOutcome) {
        self.lock().replies.push_back(Ok(outcome));
    }

    /// Queues a client-side failure.
    pub fn push_error(&self, error: ContactError) {
        self.lock().replies.push_back(Err(error));
    }

    /// Makes every later call wait for [`release`](Self::release).
    pub fn hold(&self) {
        self.lock().holding = true;
    }

    /// Lets one held call proceed.
    ///
    /// A release issued before the call arrives is remembered, so the order
    /// of `release` and the call does not matter.
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Stops holding calls. Calls already waiting still need a release.
    pub fn stop_holding(&self) {
        self.lock().holding = false;
    }

    /// Returns every field set received, oldest first.
    pub fn calls(&self) -> Vec<FieldSet> {
        self.lock().calls.clone()
    }

    /// Returns the number of calls received.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Returns the most recent field set received.
    pub fn last_call(&self) -> Option<FieldSet> {
        self.lock().calls.last().cloned()
    }

    /// Returns the number of queued replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.lock().replies.len()
    }

    /// Asserts that exactly `expected` calls were made.
    ///
    /// # Panics
    ///
    /// Panics if the call count does not match.
    pub fn assert_call_count(&self, expected: usize) {
        let actual = self.call_count();
        assert_eq!(
            actual, expected,
            "Expected {expected} submission call(s), but {actual} were made"
        );
    }
}

#[async_trait]
impl RemoteSubmissionClient for ScriptedClient {
    async fn send(&self, fields: &FieldSet) -> ContactResult<SubmissionOutcome> {
        let holding = {
            let mut state = self.lock();
            state.calls.push(fields.clone());
            state.holding
        };
        if holding {
            self.release.notified().await;
        }
        self.lock()
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(SubmissionOutcome::succeeded()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_succeeds() {
        let client = ScriptedClient::with_outcomes([SubmissionOutcome::failed("first")]);
        client.push_error(ContactError::HttpStatus(502));

        let first = client.send(&FieldSet::default()).await.unwrap();
        assert_eq!(first, SubmissionOutcome::failed("first"));
        let second = client.send(&FieldSet::default()).await.unwrap_err();
        assert!(matches!(second, ContactError::HttpStatus(502)));
        let third = client.send(&FieldSet::default()).await.unwrap();
        assert!(third.success);

        client.assert_call_count(3);
        assert_eq!(client.pending_replies(), 0);
    }

    #[tokio::test]
    async fn test_records_calls() {
        let client = ScriptedClient::new();
        let fields = FieldSet::new("Ada", "ada@example.com", "", "", "");
        client.send(&fields).await.unwrap();
        assert_eq!(client.last_call(), Some(fields.clone()));
        assert_eq!(client.calls(), vec![fields]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_and_release() {
        let client = ScriptedClient::new();
        client.hold();

        let held = tokio::time::timeout(
            Duration::from_secs(1),
            client.send(&FieldSet::default()),
        )
        .await;
        assert!(held.is_err());

        client.release();
        let released = client.send(&FieldSet::default()).await;
        assert!(released.is_ok());
        client.assert_call_count(2);
    }

    #[test]
    #[should_panic(expected = "Expected 1 submission call(s)")]
    fn test_assert_call_count_fails() {
        ScriptedClient::new().assert_call_count(1);
    }
}
