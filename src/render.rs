//! Markdown Rendering Module
//!
//! Converts markdown to HTML with comrak and layers the render cache in
//! front of the conversion: reads go through the cache keyed by canonical
//! file path and source mtime, and fresh renderings are written back.
//!
//! Cache interaction is fail-open. If the source file's mtime cannot be
//! read, caching is skipped for that call and rendering proceeds from the
//! content the caller supplied.

use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use comrak::{markdown_to_html, Options};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::RenderCache;
use crate::error::{AppError, Result};

// == Rendered Page ==
/// Output of a render call.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The HTML rendering
    pub html: String,
    /// Whether the HTML was served from the cache
    pub cached: bool,
}

// == Renderer ==
/// Markdown-to-HTML renderer with read-through/write-through caching.
pub struct Renderer {
    cache: Arc<RwLock<RenderCache>>,
    options: Options<'static>,
}

impl Renderer {
    /// Creates a renderer writing through to `cache`.
    pub fn new(cache: Arc<RwLock<RenderCache>>) -> Self {
        Self {
            cache,
            options: default_options(),
        }
    }

    // == Render ==
    /// Renders markdown `content` to HTML.
    ///
    /// With a `path`, the render cache is consulted first using the file's
    /// current mtime; a hit returns without parsing anything. On a miss the
    /// conversion runs and the result is stored under the path, tagged with
    /// the mtime observed after conversion. The file may change between
    /// those two stats; the entry is then one generation stale and the next
    /// mtime-checked `get` will evict it.
    ///
    /// Without a `path` the conversion always runs and nothing is cached.
    pub async fn render(&self, content: &str, path: Option<&Path>) -> RenderedPage {
        if let Some(path) = path {
            if let Some(mtime) = source_mtime(path) {
                let key = cache_key(path);
                let hit = self.cache.write().await.get(&key, Some(mtime));
                if let Some(html) = hit {
                    debug!(path = %path.display(), "render cache hit");
                    return RenderedPage { html, cached: true };
                }
            }
        }

        let html = markdown_to_html(content, &self.options);

        if let Some(path) = path {
            if let Some(mtime) = source_mtime(path) {
                self.cache
                    .write()
                    .await
                    .set(cache_key(path), html.clone(), mtime, None);
            }
        }

        RenderedPage { html, cached: false }
    }

    // == Render File ==
    /// Reads `path` and renders it, going through the cache.
    ///
    /// A missing file is reported as `AppError::NotFound`; other read
    /// failures surface as I/O errors. Cache trouble never fails a render.
    pub async fn render_file(&self, path: &Path) -> Result<RenderedPage> {
        let content = tokio::fs::read_to_string(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(path.display().to_string())
            } else {
                AppError::Io(err)
            }
        })?;

        Ok(self.render(&content, Some(path)).await)
    }
}

// == Helpers ==
/// Comrak options for GitHub-style rendering. Raw HTML blocks pass through
/// untouched; this server renders local files for a local reader.
fn default_options() -> Options<'static> {
    let mut options = Options::default();
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;
    options.render.github_pre_lang = true;
    options.render.r#unsafe = true;
    options
}

/// Cache key for a source path. Callers pass canonical absolute paths, so
/// the display form is stable per file.
fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Modification time of `path` as fractional seconds since the epoch, or
/// None when the file cannot be statted (fail-open for caching).
fn source_mtime(path: &Path) -> Option<f64> {
    let mtime = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|err| {
            warn!(path = %path.display(), %err, "skipping cache, cannot read mtime");
            err
        })
        .ok()?;

    mtime
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs_f64())
}
