//! Assertion verification endpoint

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use persona_core::VerificationOutcome;
use serde::Deserialize;

use crate::error::RelayError;
use crate::state::AppState;
use crate::verifier::AssertionVerifier;

/// Request body for verification
///
/// Accepted as a urlencoded form or as JSON. Any `audience` the client
/// sends is dropped; the relay always uses its own.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// The opaque signed assertion
    #[serde(default)]
    pub assertion: String,
}

#[async_trait]
impl<S> FromRequest<S> for VerifyRequest
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        let body = if is_json {
            let Json(body) = Json::<VerifyRequest>::from_request(req, state)
                .await
                .map_err(|e| RelayError::InvalidBody(e.body_text()))?;
            body
        } else {
            let Form(body) = Form::<VerifyRequest>::from_request(req, state)
                .await
                .map_err(|e| RelayError::InvalidBody(e.body_text()))?;
            body
        };

        if body.assertion.trim().is_empty() {
            return Err(RelayError::MissingAssertion);
        }

        Ok(body)
    }
}

/// POST /verify
///
/// Forward the assertion to the verification API and answer with the
/// verified email (200) or the verifier's reason (403).
pub async fn verify<V>(
    State(state): State<Arc<AppState<V>>>,
    req: VerifyRequest,
) -> Result<Json<String>, RelayError>
where
    V: AssertionVerifier + 'static,
{
    tracing::debug!(assertion_len = req.assertion.len(), "Posted assertion");

    let body = state.verifier.verify(&req.assertion, &state.audience).await?;

    match VerificationOutcome::from_verifier_body(&body)? {
        VerificationOutcome::Verified { email } => {
            tracing::info!(%email, "Assertion verified");
            Ok(Json(email))
        }
        VerificationOutcome::Rejected { reason } => Err(RelayError::Rejected(reason)),
    }
}
