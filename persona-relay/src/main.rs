//! Persona Verification Relay
//!
//! Forwards browser-submitted assertions to the remote verification API
//! using this deployment's own origin as the audience.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persona_relay::{routes, AppState, Config, RemoteVerifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    let verifier = RemoteVerifier::new(
        config.verifier_url.clone(),
        Duration::from_secs(config.verifier_timeout_secs),
    )?;
    tracing::info!(audience = %config.audience, verifier = %verifier.url(), "Verifying assertions");

    // Create app state
    let state = Arc::new(AppState::new(verifier, config.audience.clone()));

    // Create router
    let app = routes::create_router_with_static_path(state, config.static_dir.as_deref());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
