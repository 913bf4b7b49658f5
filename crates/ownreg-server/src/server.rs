use std::sync::Arc;

use tokio::net::TcpListener;

use ownreg_store::{InMemoryOwnerStore, JsonFileOwnerStore, OwnerStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Owner registry HTTP server.
pub struct OwnerServer {
    config: ServerConfig,
    state: AppState,
}

impl OwnerServer {
    /// Open the store named by `config` and wire the services over it.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = open_store(&config)?;
        Ok(Self::with_state(config, AppState::from_store(store)))
    }

    /// Serve an already-built state (useful for tests and embedding).
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("owner registry listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

/// The configured backend: a JSON file when `data_path` is set, memory otherwise.
pub fn open_store(config: &ServerConfig) -> ServerResult<Arc<dyn OwnerStore>> {
    match &config.data_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using JSON file store");
            Ok(Arc::new(JsonFileOwnerStore::open(path)?))
        }
        None => {
            tracing::warn!("no data_path configured; records will not survive a restart");
            Ok(Arc::new(InMemoryOwnerStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
