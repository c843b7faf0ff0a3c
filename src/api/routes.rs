//! API Routes
//!
//! Configures the Axum router with all URL cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    announce_handler, clean_handler, clear_handler, delete_handler, get_handler, has_handler,
    health_handler, set_handler, stats_handler, wait_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value under a URL
/// - `GET /get?url=` - Retrieve the value for a URL
/// - `GET /has?url=` - Check whether a URL has a live value
/// - `DELETE /del?url=` - Delete a URL and its pending marker
/// - `DELETE /clear` - Remove everything
/// - `POST /clean` - Sweep expired entries
/// - `POST /announce?url=` - Mark a URL as being fetched
/// - `GET /wait?url=` - Block until a URL has a value
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get", get(get_handler))
        .route("/has", get(has_handler))
        .route("/del", delete(delete_handler))
        .route("/clear", delete(clear_handler))
        .route("/clean", post(clean_handler))
        .route("/announce", post(announce_handler))
        .route("/wait", get(wait_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
