//! Persona Relay Core Library
//!
//! The wire contract shared by the verification relay and its clients:
//! - Relying parties bind every assertion to one fixed audience origin
//! - The relay forwards assertions to a remote verifier
//! - Verifier responses collapse into a single verified/rejected outcome

pub mod audience;
pub mod error;
pub mod outcome;

pub use audience::Audience;
pub use error::Error;
pub use outcome::{VerificationOutcome, VerifierResponse, RELAY_INTERNAL_ERROR, STATUS_OKAY};

/// Result type for persona-core operations
pub type Result<T> = std::result::Result<T, Error>;
