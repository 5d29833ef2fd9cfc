//! Domain error taxonomy shared by handlers and the client mirror.
//!
//! Persistence failures are not represented here; they surface as
//! `sqlx::Error` in the API layer.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced board, list, task or user does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A request body failed a domain rule (empty title, cross-board move, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The actor is neither the board owner nor one of its members.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The actor may see the board but not perform this action on it.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Shorthand for the common "not a member of this board" rejection.
    pub fn not_board_member(board_id: DbId) -> Self {
        CoreError::Unauthorized(format!("Not authorized to access board {board_id}"))
    }
}
