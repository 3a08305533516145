//! mdviewer - a local Markdown preview server
//!
//! Scans a directory for markdown files and serves a browsing, search and
//! live-preview UI over HTTP and WebSocket.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdviewer::api::create_router;
use mdviewer::browser::open_browser;
use mdviewer::port::find_available_port;
use mdviewer::watcher::{spawn_file_watcher, FileWatcher};
use mdviewer::{AppState, Config};

/// Browse, search and live-preview Markdown files in your browser.
///
/// Scans DIRECTORY recursively for .md files and serves a local web
/// interface for reading them.
#[derive(Debug, Parser)]
#[command(name = "mdviewer", version)]
struct Cli {
    /// Directory to scan for markdown files
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Port to run the server on (default: auto-detect)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind the server to
    #[arg(long)]
    host: Option<String>,

    /// Do not open the browser automatically
    #[arg(long)]
    no_browser: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Main entry point for the markdown viewer server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables, apply CLI overrides
/// 3. Build application state (render cache, renderer, event channel)
/// 4. Start the background file watcher
/// 5. Create the Axum router with all endpoints
/// 6. Bind the configured or auto-detected port and serve
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Defaults to "info" level, can be overridden with RUST_LOG
    let default_filter = if cli.debug {
        "mdviewer=debug,tower_http=debug"
    } else {
        "mdviewer=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mdviewer");

    let mut config = Config::from_env();
    config.base_dir = cli
        .directory
        .canonicalize()
        .with_context(|| format!("cannot resolve directory {}", cli.directory.display()))?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if cli.no_browser {
        config.auto_open_browser = false;
    }

    info!(
        "Configuration loaded: base_dir={}, cache_enabled={}, cache_ttl={}s, max_entries={}",
        config.base_dir.display(),
        config.cache_enabled,
        config.cache_ttl,
        config.cache_max_entries
    );

    let state = AppState::from_config(config)?;
    let config = Arc::clone(&state.config);
    info!("Render cache initialized");

    // Background file watcher feeding cache invalidation and WebSocket fan-out
    let watcher = if config.watch_files {
        match spawn_file_watcher(
            &config.base_dir,
            Arc::clone(&state.cache),
            state.events.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!(%err, "failed to start file watcher, live updates disabled");
                None
            }
        }
    } else {
        info!("File watching is disabled");
        None
    };

    let app = create_router(state);

    let port = if config.port == 0 {
        find_available_port(8000, 100)?
    } else {
        config.port
    };

    let addr: SocketAddr = format!("{}:{}", config.host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!("Server listening on http://{addr}");
    info!("Serving markdown from {}", config.base_dir.display());

    if config.auto_open_browser {
        let host = config.host.clone();
        tokio::spawn(async move {
            // Give the accept loop a moment before pointing a browser at it
            tokio::time::sleep(Duration::from_millis(1500)).await;
            let _ = tokio::task::spawn_blocking(move || open_browser(&host, port)).await;
        });
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(watcher))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, stops the file watcher and allows graceful shutdown.
async fn shutdown_signal(watcher: Option<FileWatcher>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(watcher) = watcher {
        watcher.stop();
    }
}
