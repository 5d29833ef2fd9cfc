//! Client side of the board sync protocol.
//!
//! A client opens a board by fetching its snapshot into a [`BoardMirror`],
//! then keeps the mirror live by applying every [`BoardEvent`] received on
//! the board socket. Merges are idempotent, so a client's own echoes and
//! duplicate deliveries are safe to apply.
//!
//! [`BoardEvent`]: taskboard_core::protocol::BoardEvent

pub mod api;
pub mod config;
pub mod connection;
pub mod drag;
pub mod error;
pub mod mirror;

pub use api::BoardApi;
pub use config::ClientConfig;
pub use connection::BoardConnection;
pub use drag::{DragItem, DragSession, DropOutcome, DropTarget};
pub use error::ClientError;
pub use mirror::BoardMirror;
