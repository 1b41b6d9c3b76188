//! Live stub endpoint for HTTP backend tests.
//!
//! [`LiveEndpoint`] binds a real Axum server to a random local port. The
//! canned constructors serve `POST /send-email` with a fixed reply and record
//! every JSON body received, so a test can point an
//! [`HttpSubmissionClient`](contact_rs_submit::HttpSubmissionClient) at
//! [`endpoint_url`](LiveEndpoint::endpoint_url) and check both sides.
//!
//! ## Example
//!
//! ```rust,no_run
//! use contact_rs_test::live_endpoint::LiveEndpoint;
//!
//! async fn example() {
//!     let endpoint = LiveEndpoint::replying_json(serde_json::json!({"success": true})).await;
//!     println!("Stub listening at {}", endpoint.endpoint_url());
//!     endpoint.stop().await;
//! }
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Path the canned stubs serve.
pub const SEND_EMAIL_PATH: &str = "/send-email";

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

/// A stub HTTP endpoint running in a background task.
pub struct LiveEndpoint {
    addr: SocketAddr,
    received: Received,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: Option<JoinHandle<()>>,
}

impl LiveEndpoint {
    /// Serves `app` on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the TCP listener cannot be bound.
    pub async fn start(app: Router) -> Self {
        Self::serve(app, Arc::default()).await
    }

    /// Answers `POST /send-email` with `status` and `body` as JSON.
    pub async fn replying(status: StatusCode, body: impl Into<String>) -> Self {
        Self::replying_after(Duration::ZERO, status, body).await
    }

    /// Answers `POST /send-email` with 200 and `value`.
    pub async fn replying_json(value: serde_json::Value) -> Self {
        Self::replying(StatusCode::OK, value.to_string()).await
    }

    /// Like [`replying`](Self::replying), but waits `delay` before answering.
    pub async fn replying_after(
        delay: Duration,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Self {
        let received = Received::default();
        let body = body.into();
        let recorder = Arc::clone(&received);
        let app = Router::new().route(
            SEND_EMAIL_PATH,
            post(move |request: Bytes| {
                let recorder = Arc::clone(&recorder);
                let body = body.clone();
                async move {
                    let json = serde_json::from_slice(&request).unwrap_or(serde_json::Value::Null);
                    recorder
                        .lock()
                        .expect("LiveEndpoint lock poisoned")
                        .push(json);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );
        Self::serve(app, received).await
    }

    async fn serve(app: Router, received: Received) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        }
    }

    /// Returns the base URL, e.g. `http://127.0.0.1:43210`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns the URL of the canned submission route.
    pub fn endpoint_url(&self) -> String {
        format!("{}{SEND_EMAIL_PATH}", self.url())
    }

    /// Returns the bound address.
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns every JSON body received by a canned stub, oldest first.
    ///
    /// Bodies that were not valid JSON are recorded as `null`.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received
            .lock()
            .expect("LiveEndpoint lock poisoned")
            .clone()
    }

    /// Shuts the server down and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for LiveEndpoint {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
