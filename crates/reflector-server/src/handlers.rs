//! HTTP request handlers for the query API.
//!
//! Paged endpoints answer with the bare entry array; the filtered total and
//! the "more pages" flag ride in the [`TOTAL_FILTERED_HEADER`] and
//! [`HAS_MORE_HEADER`] response headers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reflector_logs::{QueryKind, QueryResult};
use serde::Serialize;
use tracing::warn;

use crate::error::ServerResult;
use crate::state::AppState;

/// Response header carrying the number of entries that matched the filter.
pub const TOTAL_FILTERED_HEADER: &str = "x-total-filtered";

/// Response header that is `true` when older matching entries remain.
pub const HAS_MORE_HEADER: &str = "x-has-more";

/// Raw query string parameters; validation happens in the engine.
type Params = Query<HashMap<String, String>>;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

/// Handle GET /api/health - health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Handle GET /api/log - latest entries of the live log.
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> ServerResult<Response> {
    query(&state, QueryKind::Log, params).await
}

/// Handle GET /api/history - latest entries of one dated log (`?date=YYYY-MM-DD`).
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> ServerResult<Response> {
    query(&state, QueryKind::History, params).await
}

/// Handle GET /api/sources - distinct source names in the live log.
pub async fn list_sources(State(state): State<Arc<AppState>>) -> ServerResult<Response> {
    query(&state, QueryKind::Sources, HashMap::new()).await
}

/// Handle GET /api/dates - dates with a historical log, newest first.
pub async fn list_dates(State(state): State<Arc<AppState>>) -> ServerResult<Response> {
    query(&state, QueryKind::Dates, HashMap::new()).await
}

async fn query(
    state: &AppState,
    kind: QueryKind,
    params: HashMap<String, String>,
) -> ServerResult<Response> {
    let result = state.run_query(kind, params).await.inspect_err(|err| {
        if err.status().is_server_error() {
            warn!(kind = %kind, error = %err, "query failed");
        }
    })?;
    Ok(into_response(result))
}

fn into_response(result: QueryResult) -> Response {
    match result {
        QueryResult::Entries(page) => {
            let headers = [
                (TOTAL_FILTERED_HEADER, page.total_filtered.to_string()),
                (HAS_MORE_HEADER, page.has_more.to_string()),
            ];
            (headers, Json(page)).into_response()
        }
        QueryResult::Sources(names) | QueryResult::Dates(names) => Json(names).into_response(),
    }
}
