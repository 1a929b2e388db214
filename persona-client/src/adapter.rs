//! The sign-in state machine
//!
//! ```text
//! Idle -> AwaitingAssertion -> Verifying -> Authenticated | Failed
//!   ^                                            |
//!   +------------------ logout ------------------+
//! ```
//!
//! `login`, `verify` and `logout` on one adapter are queued behind each
//! other, so a second sign-in (or a sign-out) waits for the first to finish
//! instead of racing it on the session store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{AuthError, ErrorBody};
use crate::options::{parse_endpoint, AdapterConfig, ContentType, CredentialsPolicy, VerifyOptions};
use crate::provider::{IdentityProvider, ProviderEvent, ProviderFailure};
use crate::session::SessionStore;

/// Where an adapter is in the sign-in flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingAssertion,
    Verifying,
    Authenticated { email: String },
    Failed,
}

/// Receives provider notifications registered through [`AuthAdapter::watch`]
///
/// Events are delivered one at a time, in the order the provider sent them.
#[async_trait]
pub trait WatchHandler: Send + Sync + 'static {
    /// The provider produced an assertion; typically passed on to [`AuthAdapter::verify`]
    async fn on_login(&self, adapter: &AuthAdapter, assertion: String);

    /// The provider signalled a login without an assertion
    async fn on_login_error(&self, adapter: &AuthAdapter, failure: ProviderFailure);

    /// The user signed out at the provider; the session is already cleared
    async fn on_logout(&self, adapter: &AuthAdapter);
}

pub struct AuthAdapter {
    config: AdapterConfig,
    provider: Arc<dyn IdentityProvider>,
    session: SessionStore,
    client: Client,
    credentialed_client: Client,
    state: RwLock<AuthState>,
    in_flight: Mutex<()>,
}

impl AuthAdapter {
    pub fn new(
        config: AdapterConfig,
        provider: Arc<dyn IdentityProvider>,
        session: SessionStore,
    ) -> Result<Self, AuthError> {
        parse_endpoint(&config.verification_endpoint)?;

        let client = Client::builder()
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        let credentialed_client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            provider,
            session,
            client,
            credentialed_client,
            state: RwLock::new(AuthState::Idle),
            in_flight: Mutex::new(()),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn verification_endpoint(&self) -> &str {
        &self.config.verification_endpoint
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap().clone()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The email of the current session, if any
    pub fn email(&self) -> Option<String> {
        self.session.get()
    }

    /// Obtain an assertion from the provider and verify it
    pub async fn login(&self, options: &VerifyOptions) -> Result<String, AuthError> {
        let _guard = self.in_flight.lock().await;

        self.set_state(AuthState::AwaitingAssertion);
        let assertion = match self.provider.request_assertion().await {
            Ok(Some(assertion)) if !assertion.is_empty() => assertion,
            Ok(Some(_)) => {
                return Err(self.deny(ProviderFailure::new("Provider returned an empty assertion")))
            }
            Ok(None) => {
                return Err(self.deny(ProviderFailure::new("Provider returned no assertion")))
            }
            Err(failure) => return Err(self.deny(failure)),
        };

        self.verify_assertion(&assertion, options).await
    }

    /// Submit an assertion to the verification relay
    ///
    /// On success the session holds the returned email. On failure the
    /// session is cleared and, for authentication adapters, so is the
    /// provider's cached login.
    pub async fn verify(&self, assertion: &str, options: &VerifyOptions) -> Result<String, AuthError> {
        let _guard = self.in_flight.lock().await;
        self.verify_assertion(assertion, options).await
    }

    /// Clear the session and the provider's cached login
    ///
    /// Safe to call repeatedly. The provider flag is dropped and the state
    /// returns to `Idle` even when the session storage fails; that failure
    /// is returned afterwards.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _guard = self.in_flight.lock().await;

        let cleared = self.session.clear();
        self.provider.clear_cached_login();
        self.set_state(AuthState::Idle);
        tracing::info!(adapter = %self.config.name, "Logged out");

        cleared.map_err(AuthError::from)
    }

    /// Follow the provider's login/logout notifications
    ///
    /// The provider is told the current session email. A logout event
    /// clears the session before the handler sees it. The returned task
    /// ends when the provider drops its side of the channel.
    pub fn watch<H>(self: &Arc<Self>, handler: H) -> Result<JoinHandle<()>, AuthError>
    where
        H: WatchHandler,
    {
        if !self.config.capability.supports_watch() {
            return Err(AuthError::Unsupported {
                operation: "watch",
                capability: self.config.capability,
            });
        }

        let mut events = self.provider.watch(self.session.get());
        let adapter = Arc::clone(self);

        Ok(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    ProviderEvent::Login(Ok(Some(assertion))) if !assertion.is_empty() => {
                        handler.on_login(&adapter, assertion).await;
                    }
                    ProviderEvent::Login(Ok(_)) => {
                        handler
                            .on_login_error(&adapter, ProviderFailure::new("Provider returned no assertion"))
                            .await;
                    }
                    ProviderEvent::Login(Err(failure)) => {
                        handler.on_login_error(&adapter, failure).await;
                    }
                    ProviderEvent::Logout => {
                        {
                            let _guard = adapter.in_flight.lock().await;
                            if let Err(e) = adapter.session.clear() {
                                tracing::warn!(error = %e, "Failed to clear session on provider logout");
                            }
                            adapter.set_state(AuthState::Idle);
                        }
                        handler.on_logout(&adapter).await;
                    }
                }
            }
        }))
    }

    async fn verify_assertion(&self, assertion: &str, options: &VerifyOptions) -> Result<String, AuthError> {
        self.set_state(AuthState::Verifying);

        let settings = match self.config.resolve(options) {
            Ok(settings) => settings,
            Err(e) => return Err(self.fail(e)),
        };

        let client = match settings.credentials {
            CredentialsPolicy::Include => &self.credentialed_client,
            CredentialsPolicy::Omit => &self.client,
        };

        let request = client.post(settings.url.clone());
        let request = match settings.content_type {
            ContentType::Form => request.form(&[("assertion", assertion)]),
            ContentType::Json => request.json(&json!({ "assertion": assertion })),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(AuthError::Transport(e.to_string()))),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Err(self.fail(AuthError::Transport(e.to_string()))),
        };

        if !status.is_success() {
            let error = AuthError::from(ErrorBody::parse(status.as_u16(), &body));
            return Err(self.fail(error));
        }

        let email = match settings.response_format.read_email(&body) {
            Some(email) if !email.is_empty() => email,
            _ => {
                return Err(self.fail(AuthError::RelayMalformed {
                    status: status.as_u16(),
                    body,
                }))
            }
        };

        if let Err(e) = self.session.set(&email) {
            return Err(self.fail(e.into()));
        }

        tracing::info!(adapter = %self.config.name, %email, "Assertion verified");
        self.set_state(AuthState::Authenticated {
            email: email.clone(),
        });
        Ok(email)
    }

    /// The provider produced nothing; no request was made
    fn deny(&self, failure: ProviderFailure) -> AuthError {
        tracing::warn!(adapter = %self.config.name, %failure, "Assertion request denied");
        self.clear_session();
        self.set_state(AuthState::Failed);
        AuthError::ProviderDenied(failure)
    }

    /// A verification attempt failed
    fn fail(&self, error: AuthError) -> AuthError {
        tracing::warn!(adapter = %self.config.name, %error, "Assertion verification failed");
        if self.config.capability.triggers_local_logout_on_error() {
            self.provider.clear_cached_login();
        }
        self.clear_session();
        self.set_state(AuthState::Failed);
        error
    }

    fn clear_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
    }

    fn set_state(&self, state: AuthState) {
        *self.state.write().unwrap() = state;
    }
}
