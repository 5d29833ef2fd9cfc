//! Domain building blocks shared by the task board server and its clients.
//!
//! Nothing in this crate performs I/O. The server (`taskboard-api`), the
//! persistence layer (`taskboard-db`) and the client mirror
//! (`taskboard-client`) all speak in these types.

pub mod activity;
pub mod assignees;
pub mod board;
pub mod error;
pub mod position;
pub mod protocol;
pub mod types;
