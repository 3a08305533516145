//! File Watcher Module
//!
//! Watches the served directory for markdown changes and feeds them to the
//! rest of the application: modified and deleted files are invalidated in
//! the render cache, and every event is fanned out on a broadcast channel
//! for the WebSocket layer.
//!
//! Correctness never depends on the watcher. The cache's own mtime check
//! catches staleness on the next read; invalidation here is an
//! optimization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::RenderCache;
use crate::error::{AppError, Result};

// == File Events ==
/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEventKind {
    Created,
    Modified,
    Deleted,
}

/// A change to a markdown file under the watched directory.
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub kind: FileEventKind,
    pub path: PathBuf,
}

// == File Watcher ==
/// Handle keeping the filesystem watcher and its forwarding task alive.
///
/// Dropping the handle stops watching; `stop` does the same explicitly and
/// is used during graceful shutdown.
pub struct FileWatcher {
    // Held for its side effect: dropping it unregisters the OS watches.
    _watcher: RecommendedWatcher,
    forwarder: JoinHandle<()>,
}

impl FileWatcher {
    /// Stops the forwarding task and releases the OS watches.
    pub fn stop(self) {
        self.forwarder.abort();
        info!("File watcher stopped");
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

/// Starts watching `watch_path` recursively.
///
/// Events for `.md` files are classified, used to invalidate the render
/// cache where it matters, and broadcast on `events`. Send errors on the
/// broadcast channel (no connected clients) are ignored.
pub fn spawn_file_watcher(
    watch_path: &Path,
    cache: Arc<RwLock<RenderCache>>,
    events: broadcast::Sender<FileEvent>,
) -> Result<FileWatcher> {
    if !watch_path.exists() {
        return Err(AppError::Config(format!(
            "watch path does not exist: {}",
            watch_path.display()
        )));
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<FileEvent>();

    // The notify callback runs on the watcher's own thread; it only
    // classifies and forwards, everything async happens in the task below.
    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for file_event in classify(&event) {
                    let _ = tx.send(file_event);
                }
            }
            Err(err) => warn!(%err, "file watcher error"),
        })
        .map_err(|err| AppError::Internal(format!("failed to create file watcher: {err}")))?;

    watcher
        .watch(watch_path, RecursiveMode::Recursive)
        .map_err(|err| AppError::Internal(format!("failed to start file watcher: {err}")))?;

    info!(path = %watch_path.display(), "watching for markdown changes");

    let forwarder = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            debug!(kind = ?event.kind, path = %event.path.display(), "file event");

            // Proactively drop renderings the event just outdated. Created
            // files have nothing cached yet.
            if matches!(event.kind, FileEventKind::Modified | FileEventKind::Deleted) {
                let key = event.path.to_string_lossy().into_owned();
                cache.write().await.invalidate(&key);
            }

            let _ = events.send(event);
        }
    });

    Ok(FileWatcher {
        _watcher: watcher,
        forwarder,
    })
}

// == Event Classification ==
/// Maps a raw notify event onto per-file markdown events. Non-markdown
/// paths and event kinds we do not care about produce nothing.
fn classify(event: &Event) -> Vec<FileEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Modify(_) => FileEventKind::Modified,
        EventKind::Remove(_) => FileEventKind::Deleted,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .map(|path| FileEvent {
            kind,
            path: path.clone(),
        })
        .collect()
}
