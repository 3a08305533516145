//! API Handlers
//!
//! HTTP request handlers for each viewer endpoint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path as AxumPath, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::cache::{CacheStats, RenderCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheClearResponse, FileContentResponse, FileListResponse, HealthResponse, MarkdownFile,
    SearchMatch, SearchQuery, SearchResult,
};
use crate::render::Renderer;
use crate::scanner::scan_markdown_files;
use crate::watcher::FileEvent;

/// Capacity of the file-event fan-out channel; slow WebSocket clients
/// beyond this many buffered events start lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Application state shared across all handlers.
///
/// The render cache sits behind a single `Arc<RwLock<..>>`: that lock is
/// the one mutual-exclusion point for every cache operation.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe render cache
    pub cache: Arc<RwLock<RenderCache>>,
    /// Markdown renderer writing through the cache
    pub renderer: Arc<Renderer>,
    /// Application configuration, base_dir canonicalized
    pub config: Arc<Config>,
    /// File-change fan-out for WebSocket clients
    pub events: broadcast::Sender<FileEvent>,
}

impl AppState {
    /// Creates the application state from configuration.
    ///
    /// Canonicalizes the base directory once (all path containment checks
    /// compare against it) and applies the cache toggle.
    pub fn from_config(mut config: Config) -> Result<Self> {
        config.base_dir = config.base_dir.canonicalize().map_err(|err| {
            AppError::Config(format!(
                "cannot resolve base directory {}: {err}",
                config.base_dir.display()
            ))
        })?;

        let mut cache = RenderCache::new(
            config.cache_max_entries,
            config.cache_ttl,
            config.cache_max_memory_bytes,
        )?;
        cache.set_enabled(config.cache_enabled);

        let cache = Arc::new(RwLock::new(cache));
        let renderer = Arc::new(Renderer::new(Arc::clone(&cache)));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            cache,
            renderer,
            config: Arc::new(config),
            events,
        })
    }
}

/// Handler for GET /
///
/// Serves the single-page browsing shell.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// Handler for GET /api/files
///
/// Scans the base directory and returns every markdown file with metadata.
pub async fn list_files_handler(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>> {
    let started = Instant::now();
    let config = Arc::clone(&state.config);

    // The walk is synchronous filesystem work; keep it off the async workers
    let files = tokio::task::spawn_blocking(move || scan_markdown_files(&config))
        .await
        .map_err(|err| AppError::Internal(format!("scan task failed: {err}")))??;

    Ok(Json(FileListResponse {
        total_count: files.len(),
        base_dir: state.config.base_dir.display().to_string(),
        scan_time: started.elapsed().as_secs_f64(),
        files,
    }))
}

/// Handler for GET /api/files/*path
///
/// Returns raw markdown plus rendered HTML for one file. The rendered HTML
/// goes through the cache; the `cached` flag reports whether it was a hit.
pub async fn get_file_content_handler(
    State(state): State<AppState>,
    AxumPath(file_path): AxumPath<String>,
) -> Result<Json<FileContentResponse>> {
    let full_path = resolve_request_path(&state.config, &file_path)?;

    let meta = tokio::fs::metadata(&full_path).await?;
    let raw_content = tokio::fs::read_to_string(&full_path).await?;
    let rendered = state.renderer.render(&raw_content, Some(&full_path)).await;

    let file = MarkdownFile {
        relative_path: file_path.clone(),
        filename: full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: meta.len(),
        modified_at: meta.modified().map(DateTime::<Utc>::from)?,
        created_at: meta.created().ok().map(DateTime::<Utc>::from),
        title: None,
        preview: None,
        path: full_path,
    };

    Ok(Json(FileContentResponse {
        file,
        raw_content,
        html_content: rendered.html,
        cached: rendered.cached,
    }))
}

/// Handler for POST /api/search
///
/// Substring search across scanned markdown files, returning matching
/// lines with two lines of context either side.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let config = Arc::clone(&state.config);
    let results = tokio::task::spawn_blocking(move || search_files(&config, &query))
        .await
        .map_err(|err| AppError::Internal(format!("search task failed: {err}")))??;

    Ok(Json(results))
}

/// Handler for GET /api/cache/stats
///
/// Read-only snapshot of the render cache.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for DELETE /api/cache
///
/// Drops every cached rendering.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let mut cache = state.cache.write().await;
    cache.clear();
    Json(CacheClearResponse::cleared())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Helpers ==
/// Resolves a request path against the base directory, rejecting anything
/// that escapes it and anything that is not a markdown file.
fn resolve_request_path(config: &Config, file_path: &str) -> Result<PathBuf> {
    let candidate = config.base_dir.join(file_path);

    let resolved = candidate
        .canonicalize()
        .map_err(|_| AppError::NotFound(file_path.to_string()))?;

    if !resolved.starts_with(&config.base_dir) {
        return Err(AppError::AccessDenied(file_path.to_string()));
    }
    if !resolved.extension().is_some_and(|ext| ext == "md") {
        return Err(AppError::InvalidRequest(format!(
            "not a markdown file: {file_path}"
        )));
    }

    Ok(resolved)
}

/// Blocking search over the scanned file list.
fn search_files(config: &Config, query: &SearchQuery) -> Result<Vec<SearchResult>> {
    let files = scan_markdown_files(config)?;
    let mut results = Vec::new();

    let needle = if query.case_sensitive {
        query.query.clone()
    } else {
        query.query.to_lowercase()
    };

    let candidates = files
        .into_iter()
        .filter(|file| {
            query
                .path_filter
                .as_deref()
                .map_or(true, |filter| file.relative_path.contains(filter))
        })
        .take(query.limit);

    for file in candidates {
        let Ok(content) = std::fs::read_to_string(&file.path) else {
            continue;
        };

        let haystack = if query.case_sensitive {
            content.clone()
        } else {
            content.to_lowercase()
        };
        if !haystack.contains(&needle) {
            continue;
        }

        let matches = extract_matches(&content, &query.query, query.case_sensitive);
        results.push(SearchResult {
            match_count: matches.len(),
            file,
            matches,
        });
    }

    Ok(results)
}

/// Collects matching lines with up to two lines of context either side.
fn extract_matches(content: &str, query: &str, case_sensitive: bool) -> Vec<SearchMatch> {
    let lines: Vec<&str> = content.lines().collect();
    let needle = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    let mut matches = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let haystack = if case_sensitive {
            line.to_string()
        } else {
            line.to_lowercase()
        };

        if haystack.contains(&needle) {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(lines.len());
            matches.push(SearchMatch {
                line_number: i + 1,
                line: line.to_string(),
                context: lines[start..end].join("\n"),
            });
        }
    }

    matches
}
