//! Verifier responses and verification outcomes

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Status value the verifier reports for a valid assertion
pub const STATUS_OKAY: &str = "okay";

/// Fixed message the relay returns for any failure it cannot attribute to
/// the verifier's verdict (bad JSON, missing fields, transport errors)
pub const RELAY_INTERNAL_ERROR: &str = "Error while processing the response from verification API";

/// Response body of the remote verification API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierResponse {
    /// `"okay"` when the assertion verified, anything else otherwise
    pub status: String,

    /// The verified email address (if successful)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The audience the assertion was checked against (if successful)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Expiration timestamp in milliseconds (if successful)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,

    /// The issuing domain (if successful)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Error reason (if failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerifierResponse {
    /// Create a successful verifier response
    pub fn okay(email: impl Into<String>) -> Self {
        Self {
            status: STATUS_OKAY.to_string(),
            email: Some(email.into()),
            audience: None,
            expires: None,
            issuer: None,
            reason: None,
        }
    }

    /// Create a failed verifier response
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: "failure".to_string(),
            email: None,
            audience: None,
            expires: None,
            issuer: None,
            reason: Some(reason.into()),
        }
    }

    pub fn is_okay(&self) -> bool {
        self.status == STATUS_OKAY
    }
}

/// Terminal result of one verification round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified { email: String },
    Rejected { reason: String },
}

impl VerificationOutcome {
    /// Interpret a raw verifier response body
    ///
    /// Fails when the body is not JSON, carries no `status`, or reports
    /// `okay` without an email.
    pub fn from_verifier_body(body: &str) -> Result<Self> {
        let response: VerifierResponse = serde_json::from_str(body)?;
        Self::from_response(response)
    }

    /// Interpret an already-decoded verifier response
    pub fn from_response(response: VerifierResponse) -> Result<Self> {
        if response.is_okay() {
            match response.email {
                Some(email) if !email.is_empty() => Ok(Self::Verified { email }),
                _ => Err(Error::MalformedResponse(
                    "status okay without an email".to_string(),
                )),
            }
        } else {
            Ok(Self::Rejected {
                reason: response.reason.unwrap_or_default(),
            })
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Verified { email } => Some(email),
            Self::Rejected { .. } => None,
        }
    }
}
