use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{HostSummary, Pagination, StatEntry, DEFAULT_LIMIT};
use crate::ports::{HostStore, StoreError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HostStore>,
}

/// Everything a handler can fail with, mapped onto a status code.
///
/// Lookup and pagination misses are 404s, caller mistakes are 400s, and
/// anything internal collapses to a generic 500 so store details never
/// leak to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("could not read body")]
    UnreadableBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(StoreError::Internal(reason)) => {
                error!("store failure: {reason}");
                (StatusCode::INTERNAL_SERVER_ERROR, "something went wrong").into_response()
            }
            ApiError::Store(err) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
            err @ (ApiError::InvalidParameter(_) | ApiError::UnreadableBody) => {
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
        }
    }
}

/// Raw skip/limit query params.
///
/// Kept as text so "not a number" and "negative" stay distinguishable;
/// absent values fall back to skip 0 / limit 10.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    skip: Option<String>,
    limit: Option<String>,
}

impl PaginationQuery {
    fn parse(&self) -> Result<Pagination, ApiError> {
        let skip = parse_param("skip", self.skip.as_deref(), 0)?;
        let limit = parse_param("limit", self.limit.as_deref(), DEFAULT_LIMIT)?;
        Ok(Pagination::new(skip, limit))
    }
}

fn parse_param(name: &str, raw: Option<&str>, default: usize) -> Result<usize, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: i64 = raw.parse().map_err(|_| {
        ApiError::InvalidParameter(format!(
            "query param '{name}' expected to be a number: '{raw}' is not a number"
        ))
    })?;

    if value < 0 {
        return Err(ApiError::InvalidParameter(format!(
            "query param '{name}' must not be negative: got {value}"
        )));
    }

    Ok(value as usize)
}

/// Handler for GET /health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "statkeep"
        })),
    )
}

/// Handler for GET /hosts
pub async fn list_hosts_handler(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<HostSummary>>, ApiError> {
    let page = query.parse()?;
    Ok(Json(state.store.list_hosts(page).await?))
}

/// Handler for GET /hosts/{hostname}
pub async fn get_host_handler(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
) -> Result<Json<HostSummary>, ApiError> {
    Ok(Json(state.store.get_host(&hostname).await?))
}

/// Handler for GET /hosts/{hostname}/stats
pub async fn get_stats_handler(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<StatEntry>>, ApiError> {
    let page = query.parse()?;
    Ok(Json(state.store.stats_by_hostname(&hostname, page).await?))
}

/// Handler for POST /hosts/{hostname}/stats
pub async fn insert_stats_handler(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
    body: Result<Json<StatEntry>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(entry) = body.map_err(|_| ApiError::UnreadableBody)?;

    debug!(%hostname, cpu = entry.cpu, "received stat");
    state.store.insert_stats(&hostname, entry).await?;

    Ok(StatusCode::CREATED)
}
