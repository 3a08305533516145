//! mdviewer - a local web server for browsing and live-previewing
//! Markdown files.
//!
//! Scans a directory tree for `.md` files, renders them to HTML through a
//! bounded render cache, serves a browsing/search API over HTTP, and
//! pushes live update notifications to WebSocket clients when watched
//! files change.

pub mod api;
pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod port;
pub mod render;
pub mod scanner;
pub mod watcher;

pub use api::AppState;
pub use config::Config;
