//! Identity provider capability
//!
//! The provider is whatever produces signed assertions for the user (a
//! browser's navigator.id, a native sign-in dialog, a test double). The
//! adapter only ever talks to it through this trait.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Raw failure payload reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProviderFailure(pub String);

impl ProviderFailure {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }
}

/// Notifications from a provider the adapter is watching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The user signed in; `Ok(None)` or an empty string means no assertion
    /// was produced, `Err` carries the provider's own failure payload
    Login(Result<Option<String>, ProviderFailure>),
    /// The user signed out at the provider
    Logout,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the user for an assertion bound to the relying party's audience
    ///
    /// `Ok(None)` means the user dismissed the request.
    async fn request_assertion(&self) -> Result<Option<String>, ProviderFailure>;

    /// Register for login/logout notifications
    ///
    /// `logged_in_user` is the email the application currently believes is
    /// signed in, so the provider can skip redundant login events.
    fn watch(&self, logged_in_user: Option<String>) -> mpsc::UnboundedReceiver<ProviderEvent>;

    /// Forget the provider's cached "logged in" flag for this site
    fn clear_cached_login(&self);
}
