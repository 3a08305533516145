//! WebSocket Endpoint
//!
//! Pushes live file-update notifications to connected clients and answers
//! a small JSON control protocol (ping/subscribe).

use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::handlers::AppState;
use crate::watcher::FileEvent;

/// Number of currently connected WebSocket clients, for log lines.
static CONNECTED_CLIENTS: AtomicUsize = AtomicUsize::new(0);

/// Handler for GET /ws
///
/// Upgrades the connection and serves the update stream.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection loop: greet, then interleave client messages with
/// broadcast file events until either side goes away.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut events = state.events.subscribe();

    let greeting = json!({
        "type": "connected",
        "message": "Successfully connected to mdviewer",
    });
    if socket.send(Message::Text(greeting.to_string())).await.is_err() {
        return;
    }

    let total = CONNECTED_CLIENTS.fetch_add(1, Ordering::Relaxed) + 1;
    info!(total, "WebSocket client connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_client_message(&text);
                        if socket.send(Message::Text(reply.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Binary frames are not part of the protocol; pings are
                    // answered by the library.
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let payload = file_update_message(&event);
                        if socket.send(Message::Text(payload.to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagged behind file events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    let total = CONNECTED_CLIENTS.fetch_sub(1, Ordering::Relaxed) - 1;
    info!(total, "WebSocket client disconnected");
}

// == Client Protocol ==
/// Builds the reply to one client text frame.
fn handle_client_message(text: &str) -> Value {
    let Ok(message) = serde_json::from_str::<Value>(text) else {
        return json!({"type": "error", "message": "Invalid JSON format"});
    };

    match message.get("type").and_then(Value::as_str) {
        Some("ping") => json!({
            "type": "pong",
            "timestamp": message.get("timestamp").cloned().unwrap_or(Value::Null),
        }),
        Some("subscribe") => json!({
            "type": "subscribed",
            "channel": message
                .get("channel")
                .and_then(Value::as_str)
                .unwrap_or("all"),
        }),
        other => json!({
            "type": "error",
            "message": format!("Unknown message type: {}", other.unwrap_or("<missing>")),
        }),
    }
}

/// The broadcast payload for one file event.
fn file_update_message(event: &FileEvent) -> Value {
    json!({
        "type": "file_update",
        "event": event.kind,
        "path": event.path.display().to_string(),
        "filename": event
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })
}
