//! Health endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;
use crate::verifier::AssertionVerifier;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub audience: String,
}

/// GET /health
pub async fn health<V>(State(state): State<Arc<AppState<V>>>) -> Json<HealthResponse>
where
    V: AssertionVerifier + 'static,
{
    Json(HealthResponse {
        status: "ok",
        audience: state.audience.to_string(),
    })
}
