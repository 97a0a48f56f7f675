//! Reflector server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ReflectorConfig;
use crate::error::{ServerError, ServerResult};
use crate::routes::create_router;
use crate::state::AppState;

/// HTTP server for the log query API.
#[derive(Debug, Clone)]
pub struct ReflectorServer {
    state: Arc<AppState>,
}

impl ReflectorServer {
    /// Create a new server reading the logs named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine configuration is invalid.
    pub fn new(config: ReflectorConfig) -> ServerResult<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Create a server around prepared state.
    #[must_use]
    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Get the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Start the server and listen for connections.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self, addr: SocketAddr) -> ServerResult<()> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ServerResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr, e))?;

        let local = listener.local_addr().unwrap_or(addr);
        let paths = &self.state.config().engine.paths;
        info!(
            addr = %local,
            live_log = %paths.live_log.display(),
            history_dir = %paths.history_dir.display(),
            "Reflector server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!("Reflector server shut down");
        Ok(())
    }

    /// Build the router without starting a listener.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        create_router(self.state())
    }
}
