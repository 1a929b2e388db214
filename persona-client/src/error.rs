//! Adapter error types

use persona_core::RELAY_INTERNAL_ERROR;
use thiserror::Error;

use crate::options::Capability;
use crate::provider::ProviderFailure;

/// Why a sign-in attempt failed
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Identity provider produced no assertion: {0}")]
    ProviderDenied(ProviderFailure),

    #[error("Could not reach the verification relay: {0}")]
    Transport(String),

    #[error("Assertion rejected: {reason}")]
    RelayRejected { reason: String },

    #[error("Unexpected relay response ({status}): {body}")]
    RelayMalformed { status: u16, body: String },

    #[error("Session storage failed: {0}")]
    Storage(#[from] SessionError),

    #[error("{operation} is not supported by {capability:?} adapters")]
    Unsupported {
        operation: &'static str,
        capability: Capability,
    },

    #[error("Invalid verification endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl AuthError {
    /// The verifier's rejection reason, if this is a rejection
    pub fn reason(&self) -> Option<&str> {
        match self {
            AuthError::RelayRejected { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Session persistence failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A relay error response, normalised
///
/// The relay answers rejections with a plain-text reason, but JSON bodies
/// (a bare string or an object with `reason`) are understood too. Anything
/// else is kept raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    Parsed { reason: String },
    Raw { status: u16, body: String },
}

impl ErrorBody {
    pub fn parse(status: u16, body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::String(reason)) => ErrorBody::Parsed { reason },
            Ok(serde_json::Value::Object(map)) => match map.get("reason").and_then(|r| r.as_str()) {
                Some(reason) => ErrorBody::Parsed {
                    reason: reason.to_string(),
                },
                None => ErrorBody::Raw {
                    status,
                    body: body.to_string(),
                },
            },
            _ => ErrorBody::Raw {
                status,
                body: body.to_string(),
            },
        }
    }
}

impl From<ErrorBody> for AuthError {
    fn from(body: ErrorBody) -> Self {
        match body {
            ErrorBody::Parsed { reason } => AuthError::RelayRejected { reason },
            // 403 with plain text is the relay's rejection contract
            ErrorBody::Raw { status: 403, body }
                if !body.is_empty() && body != RELAY_INTERNAL_ERROR =>
            {
                AuthError::RelayRejected { reason: body }
            }
            ErrorBody::Raw { status, body } => AuthError::RelayMalformed { status, body },
        }
    }
}
