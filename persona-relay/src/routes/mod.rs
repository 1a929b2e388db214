//! HTTP routes for the relay

mod cors;
mod health;
mod verify;

use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::verifier::AssertionVerifier;

pub use cors::allow_cross_domain;
pub use verify::VerifyRequest;

/// Create the router with all routes
pub fn create_router<V>(state: Arc<AppState<V>>) -> Router
where
    V: AssertionVerifier + 'static,
{
    create_router_with_static_path(state, None)
}

/// Create the router, serving static files from `static_path` for any
/// request no other route claims
pub fn create_router_with_static_path<V>(
    state: Arc<AppState<V>>,
    static_path: Option<&Path>,
) -> Router
where
    V: AssertionVerifier + 'static,
{
    let router = Router::new()
        .route("/verify", post(verify::verify::<V>))
        .route("/health", get(health::health::<V>));

    let router = match static_path {
        Some(path) => router.fallback_service(ServeDir::new(path)),
        None => router.fallback(|| async { StatusCode::NOT_FOUND }),
    };

    router
        .layer(TraceLayer::new_for_http())
        // Outermost, so preflights never reach routing
        .layer(middleware::from_fn(cors::allow_cross_domain))
        .with_state(state)
}
