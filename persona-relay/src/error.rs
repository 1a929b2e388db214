//! Relay error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use persona_core::RELAY_INTERNAL_ERROR;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing assertion")]
    MissingAssertion,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Verifier request failed: {0}")]
    Transport(String),

    #[error("Malformed verifier response: {0}")]
    MalformedResponse(String),

    #[error("Assertion rejected: {0}")]
    Rejected(String),
}

impl From<persona_core::Error> for RelayError {
    fn from(e: persona_core::Error) -> Self {
        RelayError::MalformedResponse(e.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Transport(e.to_string())
    }
}

/// Every failure is a `403` with a plain-text body
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::MissingAssertion => {
                (StatusCode::FORBIDDEN, "Missing assertion".to_string())
            }
            RelayError::InvalidBody(msg) => {
                tracing::debug!("Invalid request body: {}", msg);
                (StatusCode::FORBIDDEN, "Invalid request body".to_string())
            }
            RelayError::Transport(msg) => {
                tracing::error!("Verifier request failed: {}", msg);
                (StatusCode::FORBIDDEN, RELAY_INTERNAL_ERROR.to_string())
            }
            RelayError::MalformedResponse(msg) => {
                tracing::error!("Error while processing the response from verification API: {}", msg);
                (StatusCode::FORBIDDEN, RELAY_INTERNAL_ERROR.to_string())
            }
            RelayError::Rejected(reason) => {
                tracing::info!(%reason, "Failed to verify assertion");
                (StatusCode::FORBIDDEN, reason)
            }
        };

        (status, message).into_response()
    }
}
