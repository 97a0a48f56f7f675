//! Server configuration.

use std::net::SocketAddr;
use std::path::Path;

use reflector_logs::EngineConfig;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};

/// Configuration for the reflector server.
///
/// Loaded from TOML; every field is optional and falls back to its default.
///
/// ```toml
/// bind_addr = "127.0.0.1:8177"
/// cors_origins = ["http://localhost:3000"]
///
/// [engine.paths]
/// live_log = "/srv/indigo/Logs/Events.txt"
/// history_dir = "/srv/indigo/Logs"
///
/// [engine.limits]
/// default_lines = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReflectorConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// CORS allowed origins (empty means all).
    pub cors_origins: Vec<String>,
    /// Query engine settings.
    pub engine: EngineConfig,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8177)),
            cors_origins: Vec::new(),
            engine: EngineConfig::default(),
        }
    }
}

impl ReflectorConfig {
    /// Create a new configuration with the specified bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Self::default()
        }
    }

    /// Set the engine configuration.
    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Add a CORS allowed origin.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origins.push(origin.into());
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> ServerResult<()> {
        self.engine
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        if let Some(bad) = self
            .cors_origins
            .iter()
            .find(|origin| origin.parse::<axum::http::HeaderValue>().is_err())
        {
            return Err(ServerError::Config(format!("invalid CORS origin: {bad}")));
        }

        Ok(())
    }
}
