//! Persona Sign-in Adapter
//!
//! Drives a sign-in from start to finish:
//! - Ask the identity provider for a signed assertion
//! - Submit it to the verification relay
//! - Persist the verified email as the session

pub mod adapter;
pub mod error;
pub mod options;
pub mod provider;
pub mod session;

pub use adapter::{AuthAdapter, AuthState, WatchHandler};
pub use error::{AuthError, ErrorBody, SessionError};
pub use options::{AdapterConfig, Capability, ContentType, CredentialsPolicy, ResponseFormat, VerifyOptions};
pub use provider::{IdentityProvider, ProviderEvent, ProviderFailure};
pub use session::{FileStorage, KeyValueStorage, MemoryStorage, SessionStore, SESSION_KEY};
