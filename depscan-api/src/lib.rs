// ---------------------------------------------------------------------------
// REST API server
// ---------------------------------------------------------------------------
//
// Exposes the dependency scan service via HTTP endpoints.

pub mod auth;
pub mod error;
pub mod request;
mod routes;
pub mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use state::AppState;

/// Configuration for the API server.
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub api_key: Option<String>,
    /// Database location; `None` uses the per-user default path.
    pub db_path: Option<PathBuf>,
}

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    routes::build_router(state)
}

/// Start the API server and block until shutdown (Ctrl+C).
pub async fn start_server(config: ApiConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.api_key, config.db_path)?);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
