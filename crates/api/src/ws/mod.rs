//! WebSocket infrastructure for live board updates.
//!
//! - [`WsManager`] tracks every open connection.
//! - [`PresenceTracker`] groups connections into per-board rooms and keeps
//!   each room's presence roster.
//! - [`RoomBroadcaster`] forwards events from the bus to the owning room.
//! - [`ConnectionDispatcher`] handles the client frames of one connection.

mod broadcaster;
mod dispatcher;
mod handler;
pub mod manager;
pub mod presence;

pub use broadcaster::RoomBroadcaster;
pub use dispatcher::ConnectionDispatcher;
pub use handler::ws_handler;
pub use manager::{WsManager, WsSender};
pub use presence::PresenceTracker;
