//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use super::session::Session;
use crate::api::AppState;

/// WebSocket upgrade handler
///
/// This is the entry point for WebSocket connections.
/// It upgrades the HTTP connection to WebSocket and starts message handling.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending messages to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let mut session = Session::new(state.defaults.clone());
    let connection_id = session.id().to_string();

    tracing::info!(connection_id = %connection_id, "WebSocket session opened");

    for message in session.open(&state.binder, &state.dispatcher) {
        let _ = tx.send(message);
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(
                            connection_id = %conn_id_for_send,
                            "WebSocket send failed, closing connection"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    let state_for_recv = Arc::clone(&state);

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&state_for_recv, &mut session, msg, &tx) {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %session.id(),
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!(connection_id = %connection_id, "WebSocket session closed");
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
fn handle_ws_message(
    state: &AppState,
    session: &mut Session,
    message: Message,
    tx: &mpsc::UnboundedSender<ServerMessage>,
) -> bool {
    let replies = match message {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_msg) => session.handle(&state.binder, &state.dispatcher, client_msg),
            Err(e) => {
                tracing::debug!(
                    connection_id = %session.id(),
                    error = %e,
                    text = %text,
                    "Invalid client message"
                );
                // Send error but keep connection open
                vec![ServerMessage::error(
                    "BAD_MESSAGE",
                    format!("Invalid message format: {}", e),
                )]
            }
        },
        Message::Binary(_) => vec![ServerMessage::error(
            "BAD_MESSAGE",
            "Binary messages not supported",
        )],
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => Vec::new(),
        Message::Close(_) => {
            tracing::debug!(connection_id = %session.id(), "Client requested close");
            return false;
        }
    };

    replies.into_iter().all(|reply| tx.send(reply).is_ok())
}
