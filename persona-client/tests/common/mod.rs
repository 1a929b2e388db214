//! Common test utilities for adapter integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use persona_client::{IdentityProvider, ProviderEvent, ProviderFailure};
use persona_core::Audience;
use persona_relay::{routes, AppState, AssertionVerifier, RelayError, RemoteVerifier};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const AUDIENCE: &str = "http://127.0.0.1:3000";

pub const VERIFIED: &str = r#"{"status":"okay","email":"user@example.com"}"#;
pub const EXPIRED: &str = r#"{"status":"failure","reason":"expired assertion"}"#;

/// Identity provider double with scripted assertions
#[derive(Default)]
pub struct FakeProvider {
    responses: Mutex<VecDeque<Result<Option<String>, ProviderFailure>>>,
    requests: AtomicUsize,
    cleared: AtomicUsize,
    watchers: Mutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
    hints: Mutex<Vec<Option<String>>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A provider whose next request yields `assertion`
    pub fn returning(assertion: Option<&str>) -> Arc<Self> {
        let provider = Self::new();
        provider.push(Ok(assertion.map(str::to_string)));
        provider
    }

    pub fn push(&self, response: Result<Option<String>, ProviderFailure>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// How many times the cached login flag was cleared
    pub fn cleared(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }

    /// Logged-in user hints passed to `watch`
    pub fn hints(&self) -> Vec<Option<String>> {
        self.hints.lock().unwrap().clone()
    }

    /// Deliver an event to every watcher
    pub fn emit(&self, event: ProviderEvent) {
        for watcher in self.watchers.lock().unwrap().iter() {
            let _ = watcher.send(event.clone());
        }
    }

    /// Drop every watcher channel
    pub fn close(&self) {
        self.watchers.lock().unwrap().clear();
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn request_assertion(&self) -> Result<Option<String>, ProviderFailure> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn watch(&self, logged_in_user: Option<String>) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.hints.lock().unwrap().push(logged_in_user);
        self.watchers.lock().unwrap().push(tx);
        rx
    }

    fn clear_cached_login(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

/// Verifier double replaying a canned body
#[derive(Clone)]
pub struct CannedVerifier {
    body: String,
    pub calls: Arc<RwLock<Vec<(String, String)>>>,
}

impl CannedVerifier {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl AssertionVerifier for CannedVerifier {
    async fn verify(&self, assertion: &str, audience: &Audience) -> Result<String, RelayError> {
        self.calls
            .write()
            .unwrap()
            .push((assertion.to_string(), audience.to_string()));
        Ok(self.body.clone())
    }
}

/// Serve a router on an ephemeral loopback port
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing is listening on
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Run a relay whose verifier answers with `body`; returns its /verify URL
pub async fn spawn_relay(body: &str) -> (String, CannedVerifier) {
    let verifier = CannedVerifier::new(body);
    let state = Arc::new(AppState::new(
        verifier.clone(),
        Audience::parse(AUDIENCE).unwrap(),
    ));
    let addr = spawn_router(routes::create_router(state)).await;
    (format!("http://{}/verify", addr), verifier)
}

/// Run a relay whose verifier cannot be reached
pub async fn spawn_relay_without_verifier() -> String {
    let verifier_addr = closed_addr().await;
    let verifier = RemoteVerifier::new(
        format!("http://{}/verify", verifier_addr),
        Duration::from_secs(5),
    )
    .unwrap();
    let state = Arc::new(AppState::new(verifier, Audience::parse(AUDIENCE).unwrap()));
    let addr = spawn_router(routes::create_router(state)).await;
    format!("http://{}/verify", addr)
}
