//! API Routes
//!
//! Configures the Axum router with all viewer endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, get_file_content_handler, health_handler,
    index_handler, list_files_handler, search_handler, AppState,
};
use super::ws::ws_handler;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Browsing shell
/// - `GET /api/files` - List all markdown files
/// - `GET /api/files/*path` - File content plus rendered HTML
/// - `POST /api/search` - Search file contents
/// - `GET /api/cache/stats` - Render cache statistics
/// - `DELETE /api/cache` - Clear the render cache
/// - `GET /health` - Health check endpoint
/// - `GET /ws` - WebSocket upgrade for live updates
///
/// # Middleware
/// - CORS: Allows any origin (this is a localhost tool)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/files", get(list_files_handler))
        .route("/api/files/*path", get(get_file_content_handler))
        .route("/api/search", post(search_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
