//! Board WebSocket message protocol.
//!
//! Every frame is a JSON text message of the shape
//! `{"type": "<name>", "data": <payload>}`. Server-to-client frames carry a
//! [`BoardEvent`] (or an error notice); client-to-server frames carry a
//! [`ClientMessage`].

use serde::{Deserialize, Serialize};

use crate::board::{Activity, List, PresenceUser, Task};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

/// The closed catalogue of events broadcast to a board room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BoardEvent {
    ListCreated(List),
    ListUpdated(List),
    ListDeleted(DbId),
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskDeleted(DbId),
    /// Full roster of the room, in join order.
    PresenceUpdate(Vec<PresenceUser>),
    ActivityLogged(Activity),
}

impl BoardEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::ListCreated(_) => "list_created",
            BoardEvent::ListUpdated(_) => "list_updated",
            BoardEvent::ListDeleted(_) => "list_deleted",
            BoardEvent::TaskCreated(_) => "task_created",
            BoardEvent::TaskUpdated(_) => "task_updated",
            BoardEvent::TaskDeleted(_) => "task_deleted",
            BoardEvent::PresenceUpdate(_) => "presence_update",
            BoardEvent::ActivityLogged(_) => "activity_logged",
        }
    }

    /// Serialize into a text frame body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Notice sent back to one connection whose frame could not be handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ErrorNotice {
    Error { message: String },
}

impl ErrorNotice {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorNotice::Error {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ErrorNotice::Error { message } => message,
        }
    }
}

/// Anything a client may receive on the board socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Event(BoardEvent),
    Error(ErrorNotice),
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

/// Messages a client sends over the board socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a board room and announce presence as `user`.
    ///
    /// The descriptor is taken as supplied; it is not verified against the
    /// authenticated identity of the connection.
    JoinBoard { board_id: DbId, user: PresenceUser },
    /// Unsubscribe from a board room.
    LeaveBoard { board_id: DbId },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
