//! Relay state

use persona_core::Audience;

use crate::verifier::AssertionVerifier;

/// Relay application state
pub struct AppState<V: AssertionVerifier> {
    /// Client for the remote verification API
    pub verifier: V,
    /// This deployment's audience, attached to every outbound verification
    pub audience: Audience,
}

impl<V: AssertionVerifier> AppState<V> {
    pub fn new(verifier: V, audience: Audience) -> Self {
        Self { verifier, audience }
    }
}
