//! Event-to-room fan-out.
//!
//! [`RoomBroadcaster`] subscribes to the event bus and forwards each
//! [`BoardBroadcast`] to every connection in the owning board's room, and
//! only those. Delivery is fire-and-forget: nothing is stored, so a client
//! that joins later sees only the persisted state it fetches itself.

use std::sync::Arc;

use axum::extract::ws::Message;
use taskboard_events::BoardBroadcast;
use tokio::sync::broadcast;

use crate::ws::PresenceTracker;

pub struct RoomBroadcaster {
    presence: Arc<PresenceTracker>,
}

impl RoomBroadcaster {
    pub fn new(presence: Arc<PresenceTracker>) -> Self {
        Self { presence }
    }

    /// Run the fan-out loop.
    ///
    /// Events are delivered in the order they were published. The loop
    /// exits when the channel is closed (i.e. the
    /// [`EventBus`](taskboard_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<BoardBroadcast>) {
        loop {
            match receiver.recv().await {
                Ok(broadcast) => {
                    self.deliver(&broadcast).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Room broadcaster lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, room broadcaster shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize once and hand the frame to every member of the room.
    ///
    /// Returns the number of connections reached.
    pub async fn deliver(&self, broadcast: &BoardBroadcast) -> usize {
        let json = match broadcast.event.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    board_id = broadcast.board_id,
                    event = broadcast.event.name(),
                    "Failed to serialize board event"
                );
                return 0;
            }
        };

        let reached = self
            .presence
            .send_to_room(broadcast.board_id, Message::Text(json.into()))
            .await;
        tracing::debug!(
            board_id = broadcast.board_id,
            event = broadcast.event.name(),
            reached,
            "Board event delivered"
        );
        reached
    }
}
