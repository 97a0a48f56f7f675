//! # reflector-server
//!
//! HTTP API over the [`reflector_logs`] query engine, built on axum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use reflector_server::{ReflectorConfig, ReflectorServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ReflectorConfig::default();
//!     let server = ReflectorServer::new(config.clone()).expect("valid config");
//!     // server.serve(config.bind_addr).await.unwrap();
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/log` | GET | Latest live log entries (`lines`, `offset`, `source`, `search`) |
//! | `/api/history` | GET | Latest entries of one dated log (`date` plus the `log` parameters) |
//! | `/api/sources` | GET | Distinct source names in the live log |
//! | `/api/dates` | GET | Dates with a historical log, newest first |
//! | `/api/health` | GET | Liveness and uptime |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use config::ReflectorConfig;
pub use error::{ServerError, ServerResult};
pub use handlers::{HAS_MORE_HEADER, TOTAL_FILTERED_HEADER};
pub use routes::create_router;
pub use server::ReflectorServer;
pub use state::AppState;
