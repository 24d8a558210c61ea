//! agent-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket and health endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use agent_gateway::api;
use agent_gateway::app_state::AppState;
use agent_gateway::config::{GatewayConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting agent-gateway");

    // Build application state with the stub agent and ledger backends
    let app_state = AppState::with_stub_backends(config.connection_settings());

    // Build router
    let app = api::build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
