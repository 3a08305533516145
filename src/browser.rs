//! Browser Launch Module
//!
//! Opens the user's default browser on the served URL. Failing to open a
//! browser is never fatal; headless machines just get a log line with the
//! URL to open manually.

use tracing::{info, warn};

/// The URL the server is reachable at.
pub fn server_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}")
}

/// Opens the default browser on the server URL.
///
/// Returns whether the launch succeeded.
pub fn open_browser(host: &str, port: u16) -> bool {
    let url = server_url(host, port);

    match open::that(&url) {
        Ok(()) => {
            info!(%url, "opened browser");
            true
        }
        Err(err) => {
            warn!(%err, "failed to open browser, please open manually: {url}");
            false
        }
    }
}
