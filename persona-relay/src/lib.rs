//! Persona Verification Relay
//!
//! Accepts assertions from browser clients, forwards them to the remote
//! verification API bound to this deployment's own audience, and reports
//! back the verified email or the rejection reason.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod verifier;

pub use config::Config;
pub use error::RelayError;
pub use state::AppState;
pub use verifier::{AssertionVerifier, RemoteVerifier};
