//! Task board event bus and mutation log.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, carrying [`BoardBroadcast`] envelopes.
//! - [`ActivityRecorder`]: appends an audit record for a committed mutation
//!   and announces it on the bus as `activity_logged`.

pub mod bus;
pub mod recorder;

pub use bus::{BoardBroadcast, EventBus};
pub use recorder::ActivityRecorder;
