//! Duelbox - Application Entry Point
//!
//! This is the main entry point for the Duelbox server.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duelbox::{config::CONFIG, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Duelbox server...");

    if CONFIG.auth.token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; bearer-token check disabled");
    }

    // Create application state (engine pool sized from config)
    let state = AppState::new(CONFIG.clone());

    tracing::info!(
        max_concurrent = CONFIG.engine.max_concurrent,
        max_queue_depth = CONFIG.engine.max_queue_depth,
        time_limit_ms = CONFIG.sandbox.time_limit_ms,
        memory_limit_mb = CONFIG.sandbox.memory_limit_mb,
        "Execution engine configured"
    );

    // Build the router
    let app = duelbox::app(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
