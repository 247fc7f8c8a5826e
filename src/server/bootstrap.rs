use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::blinds::BlindStructure;
use crate::game::{Game, GameEngine};
use crate::store::SharedPlayerStore;

use super::PokerServer;

const LOG_TARGET: &str = "server::bootstrap";

pub struct ServerConfig {
    pub bind: SocketAddr,
    pub store: SharedPlayerStore,
    pub blinds: BlindStructure,
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let game: Arc<dyn Game> = Arc::new(GameEngine::new(
        Arc::clone(&config.store),
        config.blinds.clone(),
    ));
    let server = PokerServer::new(config.store, game);
    let make_service = server.into_router().into_make_service();

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(
        target = LOG_TARGET,
        %local_addr,
        blind_levels = config.blinds.len(),
        "poker league server listening"
    );

    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    use tracing::warn;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = LOG_TARGET,
            error = %err,
            "failed to install ctrl-c handler"
        );
    }
    info!(target = LOG_TARGET, "shutdown signal received");
}
