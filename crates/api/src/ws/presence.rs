//! Board rooms and presence rosters.
//!
//! A room is the set of connections that joined one board. Each member
//! carries the user descriptor it joined with and the sender used to push
//! frames to it. Roster order is join order; a connection that joins the
//! same room again keeps its slot and has its descriptor replaced.
//!
//! Rooms are locked individually, so traffic on one board never waits on
//! another. A room that loses its last member is marked closed and removed;
//! a join that races with the removal retries against a fresh room.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use indexmap::IndexMap;
use taskboard_core::board::PresenceUser;
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;
use tokio::sync::{Mutex, RwLock};

use crate::ws::manager::WsSender;

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

struct RoomMember {
    user: PresenceUser,
    sender: WsSender,
}

#[derive(Default)]
struct Room {
    /// Keyed by connection id, in join order.
    members: IndexMap<String, RoomMember>,
}

impl Room {
    fn roster(&self) -> Vec<PresenceUser> {
        self.members.values().map(|m| m.user.clone()).collect()
    }

    /// Push a frame to every member. Returns how many channels accepted it.
    fn send_all(&self, message: &Message) -> usize {
        self.members
            .values()
            .filter(|m| m.sender.send(message.clone()).is_ok())
            .count()
    }

    fn announce_roster(&self, board_id: DbId) {
        match BoardEvent::PresenceUpdate(self.roster()).to_json() {
            Ok(json) => {
                self.send_all(&Message::Text(json.into()));
            }
            Err(e) => {
                tracing::error!(error = %e, board_id, "Failed to serialize presence update");
            }
        }
    }
}

struct RoomHandle {
    /// Set under the room lock once the last member leaves.
    closed: AtomicBool,
    room: Mutex<Room>,
}

impl RoomHandle {
    fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            room: Mutex::new(Room::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// PresenceTracker
// ---------------------------------------------------------------------------

/// Per-board rooms of live connections.
///
/// Created once at startup, shared via `Arc`, and cleared at shutdown.
pub struct PresenceTracker {
    rooms: RwLock<HashMap<DbId, Arc<RoomHandle>>>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Add (or refresh) a connection in a board's room, then send the full
    /// roster to every member including the joiner.
    ///
    /// The `user` descriptor is taken as supplied by the client.
    pub async fn join(
        &self,
        board_id: DbId,
        conn_id: &str,
        user: PresenceUser,
        sender: WsSender,
    ) -> Vec<PresenceUser> {
        loop {
            let handle = self.open_room(board_id).await;
            let mut room = handle.room.lock().await;
            if handle.closed.load(Ordering::Acquire) {
                // Emptied and discarded between lookup and lock.
                continue;
            }

            room.members
                .insert(conn_id.to_string(), RoomMember { user, sender });
            room.announce_roster(board_id);

            tracing::debug!(board_id, conn_id, members = room.members.len(), "Joined room");
            return room.roster();
        }
    }

    /// Remove a connection from one room. Remaining members receive the
    /// updated roster; an emptied room is discarded.
    ///
    /// Returns `false` if the connection was not in the room.
    pub async fn leave(&self, board_id: DbId, conn_id: &str) -> bool {
        let Some(handle) = self.rooms.read().await.get(&board_id).cloned() else {
            return false;
        };

        let mut room = handle.room.lock().await;
        if room.members.shift_remove(conn_id).is_none() {
            return false;
        }

        if !room.members.is_empty() {
            room.announce_roster(board_id);
            tracing::debug!(board_id, conn_id, members = room.members.len(), "Left room");
            return true;
        }

        handle.closed.store(true, Ordering::Release);
        drop(room);

        let mut rooms = self.rooms.write().await;
        if rooms
            .get(&board_id)
            .is_some_and(|current| Arc::ptr_eq(current, &handle))
        {
            rooms.remove(&board_id);
        }
        tracing::debug!(board_id, conn_id, "Room emptied and discarded");
        true
    }

    /// Remove a closing connection from every room it joined.
    pub async fn disconnect(&self, conn_id: &str, boards: &[DbId]) {
        for &board_id in boards {
            self.leave(board_id, conn_id).await;
        }
    }

    /// Current roster of a room, in join order. Empty if nobody is there.
    pub async fn roster(&self, board_id: DbId) -> Vec<PresenceUser> {
        let Some(handle) = self.rooms.read().await.get(&board_id).cloned() else {
            return Vec::new();
        };
        let room = handle.room.lock().await;
        room.roster()
    }

    /// Push a frame to every connection in a board's room.
    ///
    /// Returns the number of connections the message was handed to.
    pub async fn send_to_room(&self, board_id: DbId, message: Message) -> usize {
        let Some(handle) = self.rooms.read().await.get(&board_id).cloned() else {
            return 0;
        };
        let room = handle.room.lock().await;
        room.send_all(&message)
    }

    /// Number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Drop every room. Used at shutdown.
    pub async fn clear(&self) {
        let mut rooms = self.rooms.write().await;
        for handle in rooms.values() {
            handle.closed.store(true, Ordering::Release);
        }
        let count = rooms.len();
        rooms.clear();
        tracing::info!(count, "Cleared presence rooms");
    }

    /// The live room for `board_id`, creating it (or replacing a closed one).
    async fn open_room(&self, board_id: DbId) -> Arc<RoomHandle> {
        if let Some(handle) = self.rooms.read().await.get(&board_id) {
            if !handle.closed.load(Ordering::Acquire) {
                return Arc::clone(handle);
            }
        }

        let mut rooms = self.rooms.write().await;
        let handle = rooms
            .entry(board_id)
            .and_modify(|existing| {
                if existing.closed.load(Ordering::Acquire) {
                    *existing = Arc::new(RoomHandle::new());
                }
            })
            .or_insert_with(|| Arc::new(RoomHandle::new()));
        Arc::clone(handle)
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
