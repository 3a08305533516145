//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. CLI flags override these values in the binary.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via `MDVIEWER_*` environment variables
/// with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub host: String,
    /// HTTP server port; 0 means probe for a free one
    pub port: u16,
    /// Base directory scanned for markdown files
    pub base_dir: PathBuf,
    /// Open the default browser once the server is up
    pub auto_open_browser: bool,
    /// Master toggle for the render cache
    pub cache_enabled: bool,
    /// Default render cache TTL in seconds
    pub cache_ttl: u64,
    /// Render cache entry cap
    pub cache_max_entries: usize,
    /// Render cache memory budget in bytes
    pub cache_max_memory_bytes: usize,
    /// Watch the base directory for changes
    pub watch_files: bool,
    /// Files larger than this are skipped by the scanner (bytes)
    pub max_file_size: u64,
    /// Maximum scan depth below the base directory, None = unlimited
    pub max_depth: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MDVIEWER_HOST` - Server host (default: 127.0.0.1)
    /// - `MDVIEWER_PORT` - Server port, 0 = auto-detect (default: 0)
    /// - `MDVIEWER_BASE_DIR` - Directory to scan (default: current directory)
    /// - `MDVIEWER_AUTO_OPEN_BROWSER` - Open browser on startup (default: true)
    /// - `MDVIEWER_CACHE_ENABLED` - Enable the render cache (default: true)
    /// - `MDVIEWER_CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `MDVIEWER_CACHE_MAX_ENTRIES` - Cache entry cap (default: 1000)
    /// - `MDVIEWER_CACHE_MAX_MEMORY_BYTES` - Cache memory budget (default: 100 MiB)
    /// - `MDVIEWER_WATCH_FILES` - Enable the file watcher (default: true)
    /// - `MDVIEWER_MAX_FILE_SIZE` - Scanner size cutoff in bytes (default: 10 MiB)
    /// - `MDVIEWER_MAX_DEPTH` - Scan depth limit (default: unlimited)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("MDVIEWER_HOST").unwrap_or(defaults.host),
            port: env_parsed("MDVIEWER_PORT").unwrap_or(defaults.port),
            base_dir: env::var("MDVIEWER_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.base_dir),
            auto_open_browser: env_bool("MDVIEWER_AUTO_OPEN_BROWSER")
                .unwrap_or(defaults.auto_open_browser),
            cache_enabled: env_bool("MDVIEWER_CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            cache_ttl: env_parsed("MDVIEWER_CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_max_entries: env_parsed("MDVIEWER_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_max_memory_bytes: env_parsed("MDVIEWER_CACHE_MAX_MEMORY_BYTES")
                .unwrap_or(defaults.cache_max_memory_bytes),
            watch_files: env_bool("MDVIEWER_WATCH_FILES").unwrap_or(defaults.watch_files),
            max_file_size: env_parsed("MDVIEWER_MAX_FILE_SIZE").unwrap_or(defaults.max_file_size),
            max_depth: env_parsed("MDVIEWER_MAX_DEPTH"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            auto_open_browser: true,
            cache_enabled: true,
            cache_ttl: 300,
            cache_max_entries: 1000,
            cache_max_memory_bytes: 100 * 1024 * 1024,
            watch_files: true,
            max_file_size: 10 * 1024 * 1024,
            max_depth: None,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
