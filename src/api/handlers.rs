//! API Handlers
//!
//! Thin HTTP handlers translating requests into cache façade calls.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::facade::Cache;
use crate::models::{GetResponse, HealthResponse, PutParams, StatsResponse, StatusResponse};

/// Cache type served over HTTP.
pub type HttpCache = Cache<String, String>;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: HttpCache,
}

impl AppState {
    pub fn new(cache: HttpCache) -> Self {
        Self { cache }
    }

    /// Opens the cache described by `config`, replaying its log.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Cache::open(config)?))
    }
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for POST /cache/:key?value=&ttl=
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    params: std::result::Result<Query<PutParams>, QueryRejection>,
) -> Result<Json<StatusResponse>> {
    let Query(params) = params.map_err(|e| CacheError::InvalidRequest(e.body_text()))?;
    state.cache.put(key.clone(), params.value, params.ttl);
    Ok(Json(StatusResponse::ok(key)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StatusResponse>> {
    match state.cache.remove(&key) {
        Some(_) => Ok(Json(StatusResponse::ok(key))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = &state.cache;
    Json(StatsResponse::new(
        cache.stats(),
        cache.capacity(),
        cache.pending_records(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
