//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hand-off point between mutation handlers and the
//! room broadcaster. It is shared via `Arc<EventBus>` across the
//! application.

use serde::Serialize;
use tokio::sync::broadcast;
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;

// ---------------------------------------------------------------------------
// BoardBroadcast
// ---------------------------------------------------------------------------

/// An event addressed to every connection in one board's room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardBroadcast {
    pub board_id: DbId,
    pub event: BoardEvent,
}

impl BoardBroadcast {
    pub fn new(board_id: DbId, event: BoardEvent) -> Self {
        Self { board_id, event }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use taskboard_core::protocol::BoardEvent;
/// use taskboard_events::bus::{BoardBroadcast, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(BoardBroadcast::new(1, BoardEvent::TaskDeleted(7)));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<BoardBroadcast>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Delivery is fire-and-forget: with no subscribers the event is dropped.
    pub fn publish(&self, broadcast: BoardBroadcast) {
        tracing::debug!(
            board_id = broadcast.board_id,
            event = broadcast.event.name(),
            "Publishing board event"
        );
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(broadcast);
    }

    /// Shorthand for `publish(BoardBroadcast::new(board_id, event))`.
    pub fn emit(&self, board_id: DbId, event: BoardEvent) {
        self.publish(BoardBroadcast::new(board_id, event));
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardBroadcast> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
