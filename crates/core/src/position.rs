//! Ordering model for lists within a board and tasks within a list.
//!
//! A position is a sort key, not a unique key. New entities are appended at
//! `sibling_count`, and a move writes the new `(list_id, position)` to the
//! moved task alone. Siblings are never renumbered, so positions may become
//! sparse or duplicated over time; readers order by `(position, id)` and
//! treat ties as stable but not meaningful.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Integer sort key within a parent collection.
pub type Position = i32;

/// Anything ordered by [`Position`] with identity as tie-breaker.
pub trait Positioned {
    fn id(&self) -> DbId;
    fn position(&self) -> Position;
}

/// Position assigned to a newly created entity: the number of siblings that
/// already exist in the parent collection.
///
/// Counts that overflow `i32` saturate rather than wrap.
pub fn append_position(sibling_count: i64) -> Position {
    Position::try_from(sibling_count.max(0)).unwrap_or(Position::MAX)
}

/// Reject negative positions supplied by clients.
pub fn validate_position(position: Position) -> Result<(), CoreError> {
    if position < 0 {
        return Err(CoreError::Validation(format!(
            "position must be zero or greater, got {position}"
        )));
    }
    Ok(())
}

/// Display order: ascending position, then ascending id.
pub fn compare<T: Positioned>(a: &T, b: &T) -> Ordering {
    a.position()
        .cmp(&b.position())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Sort a collection into display order.
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by(compare);
}

/// Cross-board moves are not supported: a task's board never changes.
pub fn ensure_same_board(task_board_id: DbId, target_list_board_id: DbId) -> Result<(), CoreError> {
    if task_board_id != target_list_board_id {
        return Err(CoreError::Validation(format!(
            "Cannot move a task from board {task_board_id} into a list on board {target_list_board_id}"
        )));
    }
    Ok(())
}

/// The persisted outcome of a task drag: destination list and final index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlacement {
    pub list_id: DbId,
    pub position: Position,
}
