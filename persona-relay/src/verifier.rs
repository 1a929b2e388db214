//! Remote verification API client
//!
//! The relay never checks signatures itself. It hands the assertion and its
//! own audience to the verifier and returns whatever body comes back for the
//! route layer to interpret.

use std::time::Duration;

use async_trait::async_trait;
use persona_core::Audience;
use reqwest::Client;

use crate::error::RelayError;

/// Something that can check an assertion against an audience
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    /// Submit one assertion and return the verifier's raw response body
    ///
    /// Transport failures are errors; any response body, whatever its
    /// status code, is returned as-is.
    async fn verify(&self, assertion: &str, audience: &Audience) -> Result<String, RelayError>;
}

/// Verifier reached over HTTPS
pub struct RemoteVerifier {
    client: Client,
    url: String,
}

impl RemoteVerifier {
    /// Create a verifier client for the given endpoint
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AssertionVerifier for RemoteVerifier {
    async fn verify(&self, assertion: &str, audience: &Audience) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("assertion", assertion), ("audience", audience.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, %body, "Verifier response");

        Ok(body)
    }
}
