//! Error types for the Persona wire contract

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid audience '{value}': {reason}")]
    InvalidAudience { value: String, reason: String },

    #[error("Malformed verifier response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
