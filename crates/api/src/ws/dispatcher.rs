//! Per-connection handling of client frames.

use std::sync::Arc;

use axum::extract::ws::Message;
use taskboard_core::board::PresenceUser;
use taskboard_core::protocol::{ClientMessage, ErrorNotice};
use taskboard_core::types::DbId;

use crate::ws::manager::WsSender;
use crate::ws::PresenceTracker;

/// Decodes the text frames of one connection into [`ClientMessage`]s and
/// applies them to the presence tracker.
///
/// Remembers which rooms the connection joined so they can all be left
/// when it closes.
pub struct ConnectionDispatcher {
    conn_id: String,
    /// Subject of the token the socket was opened with, if any.
    verified_user: Option<DbId>,
    sender: WsSender,
    presence: Arc<PresenceTracker>,
    joined: Vec<DbId>,
}

impl ConnectionDispatcher {
    pub fn new(
        conn_id: String,
        verified_user: Option<DbId>,
        sender: WsSender,
        presence: Arc<PresenceTracker>,
    ) -> Self {
        Self {
            conn_id,
            verified_user,
            sender,
            presence,
            joined: Vec::new(),
        }
    }

    /// Boards this connection is currently in, in join order.
    pub fn joined(&self) -> &[DbId] {
        &self.joined
    }

    /// Handle one text frame. Undecodable frames get an `error` frame back
    /// and leave the connection open.
    pub async fn handle_text(&mut self, text: &str) {
        match ClientMessage::parse(text) {
            Ok(message) => self.dispatch(message).await,
            Err(e) => {
                tracing::debug!(conn_id = %self.conn_id, error = %e, "Undecodable client frame");
                self.send_error(format!("Unrecognized message: {e}"));
            }
        }
    }

    pub async fn dispatch(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::JoinBoard { board_id, user } => self.join(board_id, user).await,
            ClientMessage::LeaveBoard { board_id } => self.leave(board_id).await,
        }
    }

    /// Leave every joined room. Called once when the socket closes.
    pub async fn finish(&mut self) {
        let boards = std::mem::take(&mut self.joined);
        self.presence.disconnect(&self.conn_id, &boards).await;
    }

    async fn join(&mut self, board_id: DbId, user: PresenceUser) {
        // The descriptor is trusted as sent; a mismatch is only reported.
        if let Some(verified) = self.verified_user {
            if verified != user.id {
                tracing::warn!(
                    conn_id = %self.conn_id,
                    board_id,
                    token_user_id = verified,
                    claimed_user_id = user.id,
                    "Presence identity differs from token subject"
                );
            }
        }

        tracing::info!(
            conn_id = %self.conn_id,
            board_id,
            user_id = user.id,
            "Joining board room"
        );
        self.presence
            .join(board_id, &self.conn_id, user, self.sender.clone())
            .await;
        if !self.joined.contains(&board_id) {
            self.joined.push(board_id);
        }
    }

    async fn leave(&mut self, board_id: DbId) {
        self.joined.retain(|&b| b != board_id);
        if self.presence.leave(board_id, &self.conn_id).await {
            tracing::info!(conn_id = %self.conn_id, board_id, "Left board room");
        }
    }

    fn send_error(&self, message: String) {
        match serde_json::to_string(&ErrorNotice::new(message)) {
            Ok(json) => {
                let _ = self.sender.send(Message::Text(json.into()));
            }
            Err(e) => {
                tracing::error!(conn_id = %self.conn_id, error = %e, "Failed to serialize error frame");
            }
        }
    }
}
