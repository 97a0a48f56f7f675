//! Route configuration for the query API.

use std::sync::Arc;

use axum::http::HeaderName;
use axum::routing::{get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ReflectorConfig;
use crate::handlers::{
    get_history, get_log, health_check, list_dates, list_sources, HAS_MORE_HEADER,
    TOTAL_FILTERED_HEADER,
};
use crate::state::AppState;

/// Create the query API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(state.config());

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/log", get(get_log))
        .route("/history", get(get_history))
        .route("/sources", get(list_sources))
        .route("/dates", get(list_dates));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &ReflectorConfig) -> CorsLayer {
    let exposed = [
        HeaderName::from_static(TOTAL_FILTERED_HEADER),
        HeaderName::from_static(HAS_MORE_HEADER),
    ];

    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(exposed);

    if config.cors_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        layer.allow_origin(origins)
    }
}
