//! API Handlers
//!
//! HTTP request handlers for each URL cache endpoint.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::cache::UrlCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    AnnounceResponse, CleanResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse,
    SetRequest, SetResponse, StatsResponse, UrlQuery,
};

/// Application state shared across all handlers.
///
/// The cache does no locking itself, so it lives behind an `RwLock`. Every
/// read may evict, hence handlers take the write half.
#[derive(Clone)]
pub struct AppState {
    /// Shared URL cache
    pub cache: Arc<RwLock<UrlCache<String>>>,
    /// How long `/wait` blocks before giving up
    pub wait_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: UrlCache<String>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            wait_timeout: Config::default().wait_timeout(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            wait_timeout: config.wait_timeout(),
            ..Self::new(UrlCache::new(config.cache_options()))
        }
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }
}

/// Handler for PUT /set
///
/// Stores a value under the canonical form of the given URL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let call = req.call_options();
    let mut cache = state.cache.write().await;
    let key = cache.set_with(&req.url, req.value, &call)?;

    Ok(Json(SetResponse::new(key.into_string())))
}

/// Handler for GET /get?url=
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.write().await;
    let key = cache.canonicalize(&query.url)?;

    match cache.get(&key)? {
        Some(value) => Ok(Json(GetResponse::new(key.as_str(), value.clone()))),
        None => Err(CacheError::NotFound(key.into_string())),
    }
}

/// Handler for GET /has?url=
pub async fn has_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<HasResponse>> {
    let mut cache = state.cache.write().await;
    let key = cache.canonicalize(&query.url)?;
    let present = cache.has(&key)?;

    Ok(Json(HasResponse {
        key: key.into_string(),
        present,
    }))
}

/// Handler for DELETE /del?url=
///
/// Deleting an absent key is not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    let key = cache.canonicalize(&query.url)?;
    cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key.into_string())))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    state.cache.write().await.clear();
    Json(DeleteResponse::cleared())
}

/// Handler for POST /clean
pub async fn clean_handler(State(state): State<AppState>) -> Json<CleanResponse> {
    let removed = state.cache.write().await.clean();
    Json(CleanResponse { removed })
}

/// Handler for POST /announce?url=
///
/// Marks the URL as being fetched. `announced` is true only for the first
/// caller, which is expected to follow up with PUT /set.
pub async fn announce_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<AnnounceResponse>> {
    let mut cache = state.cache.write().await;
    let key = cache.canonicalize(&query.url)?;
    let announced = cache.announce(&key)?;

    Ok(Json(AnnounceResponse {
        key: key.into_string(),
        announced,
    }))
}

/// Handler for GET /wait?url=
///
/// Blocks until a value is set for the URL, the key is deleted, or the
/// configured timeout elapses. The lock is released while waiting.
pub async fn wait_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<GetResponse>> {
    let waiter = state.cache.write().await.wait(&query.url)?;
    let key = waiter.key().to_string();
    debug!(key = %key, "Waiting for pending value");

    match tokio::time::timeout(state.wait_timeout, waiter).await {
        Ok(value) => Ok(Json(GetResponse::new(key, value?))),
        Err(_) => {
            // The timed-out waiter is gone; drop its marker if it was the last one
            state.cache.write().await.prune_pending();
            Err(CacheError::WaitTimeout(key))
        }
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.pending_len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
