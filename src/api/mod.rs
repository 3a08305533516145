//! API Module
//!
//! HTTP handlers, WebSocket endpoint and routing for the viewer.
//!
//! # Endpoints
//! - `GET /` - Browsing shell
//! - `GET /api/files` - List all markdown files
//! - `GET /api/files/*path` - File content plus rendered HTML
//! - `POST /api/search` - Search file contents
//! - `GET /api/cache/stats` - Render cache statistics
//! - `DELETE /api/cache` - Clear the render cache
//! - `GET /health` - Health check endpoint
//! - `GET /ws` - WebSocket upgrade for live updates

pub mod handlers;
pub mod routes;
pub mod ws;

pub use handlers::AppState;
pub use routes::create_router;
