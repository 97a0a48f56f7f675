//! Shared state for request handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use reflector_logs::{QueryEngine, QueryKind, QueryResult};

use crate::config::ReflectorConfig;
use crate::error::{ServerError, ServerResult};

/// State shared by every handler.
#[derive(Debug)]
pub struct AppState {
    config: ReflectorConfig,
    engine: Arc<QueryEngine>,
    start_time: Instant,
}

impl AppState {
    /// Create state with an engine over the local file system.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine configuration is invalid.
    pub fn new(config: ReflectorConfig) -> ServerResult<Self> {
        let engine = QueryEngine::new(config.engine.clone())?;
        Ok(Self::with_engine(config, Arc::new(engine)))
    }

    /// Create state around an existing engine.
    #[must_use]
    pub fn with_engine(config: ReflectorConfig, engine: Arc<QueryEngine>) -> Self {
        Self {
            config,
            engine,
            start_time: Instant::now(),
        }
    }

    /// Get the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    /// Get the query engine.
    #[must_use]
    pub fn engine(&self) -> Arc<QueryEngine> {
        Arc::clone(&self.engine)
    }

    /// Get server uptime in seconds.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run a query on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns the query's error, or [`ServerError::Internal`] if the worker died.
    pub async fn run_query(
        &self,
        kind: QueryKind,
        params: HashMap<String, String>,
    ) -> ServerResult<QueryResult> {
        let engine = self.engine();
        tokio::task::spawn_blocking(move || {
            let request = engine.request(kind, &params)?;
            engine.execute(&request)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("query worker failed: {e}")))?
        .map_err(ServerError::from)
    }
}
