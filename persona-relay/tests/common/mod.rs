//! Common test utilities for relay integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::routing::post;
use axum::{Form, Router};
use axum_test::TestServer;
use persona_core::Audience;
use persona_relay::{routes, AppState, AssertionVerifier, RelayError};
use tokio::net::TcpListener;

pub const AUDIENCE: &str = "http://127.0.0.1:3000";

/// Mock verifier that replays a canned body and records every call
#[derive(Clone)]
pub struct MockVerifier {
    /// Body to return, or a transport error message
    response: Result<String, String>,
    /// Captured (assertion, audience) pairs
    pub calls: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockVerifier {
    pub fn responding(body: &str) -> Self {
        Self {
            response: Ok(body.to_string()),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl AssertionVerifier for MockVerifier {
    async fn verify(&self, assertion: &str, audience: &Audience) -> Result<String, RelayError> {
        self.calls
            .write()
            .unwrap()
            .push((assertion.to_string(), audience.to_string()));
        self.response.clone().map_err(RelayError::Transport)
    }
}

/// Create a test server whose verifier answers with `body`
pub fn create_test_server(body: &str) -> (TestServer, MockVerifier) {
    create_test_server_with(MockVerifier::responding(body))
}

/// Create a test server around the given verifier
pub fn create_test_server_with<V>(verifier: V) -> (TestServer, V)
where
    V: AssertionVerifier + Clone + 'static,
{
    let state = Arc::new(AppState::new(
        verifier.clone(),
        Audience::parse(AUDIENCE).unwrap(),
    ));

    let app = routes::create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, verifier)
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

/// Stand-in for the remote verification API
///
/// Answers every `POST /verify` with `body` and records the submitted form.
pub async fn spawn_fake_verifier(
    body: &'static str,
) -> (SocketAddr, Arc<RwLock<Vec<HashMap<String, String>>>>) {
    let received = Arc::new(RwLock::new(Vec::new()));
    let sink = received.clone();

    let app = Router::new().route(
        "/verify",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let sink = sink.clone();
            async move {
                sink.write().unwrap().push(form);
                body
            }
        }),
    );

    (spawn_router(app).await, received)
}
