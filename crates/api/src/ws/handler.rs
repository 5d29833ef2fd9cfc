use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use taskboard_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::authenticate;
use crate::state::AppState;
use crate::ws::ConnectionDispatcher;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// GET /api/v1/ws
///
/// Upgrades the connection to WebSocket. A `?token=` is optional; when
/// present it must be valid, and its subject is recorded on the
/// connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let verified_user = params
        .token
        .as_deref()
        .map(|token| authenticate(token, &state.config.jwt))
        .transpose()?;

    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state, verified_user))
        .into_response())
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Feeds inbound text frames to the connection's dispatcher.
///   4. Leaves every joined room and unregisters on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, verified_user: Option<DbId>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = ?verified_user, "WebSocket connected");

    let mut rx = state.ws_manager.add(conn_id.clone()).await;
    let Some(sender) = state.ws_manager.sender(&conn_id).await else {
        tracing::error!(conn_id = %conn_id, "Connection vanished before dispatch started");
        return;
    };

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    let mut dispatcher = ConnectionDispatcher::new(
        conn_id.clone(),
        verified_user,
        sender,
        state.presence.clone(),
    );

    // Receiver loop: one dispatcher per connection.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => dispatcher.handle_text(text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    dispatcher.finish().await;
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
