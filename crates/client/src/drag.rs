//! Drag-and-drop reordering against a [`BoardMirror`].
//!
//! While a drag is in progress every hover rearranges the mirror so the
//! user sees the card or column where it would land. Nothing is persisted
//! until the drop, and a drop produces at most one persistence call: a task
//! that ended up somewhere new yields a [`TaskPlacement`]. Column reorders
//! stay local to the mirror.

use taskboard_core::position::{Position, TaskPlacement};
use taskboard_core::types::DbId;

use crate::mirror::BoardMirror;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItem {
    Task(DbId),
    List(DbId),
}

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Task(DbId),
    List(DbId),
}

/// Result of finishing a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Abandoned, or the item vanished mid-drag.
    Cancelled,
    /// Dropped where it started; nothing to persist.
    Unchanged,
    /// The task must be persisted at this placement.
    MoveTask {
        task_id: DbId,
        placement: TaskPlacement,
    },
    /// Columns were reordered in the mirror only. Holds the new column order.
    ListsReordered(Vec<DbId>),
}

#[derive(Debug, Clone, Copy)]
enum Origin {
    Task { list_id: DbId, index: usize },
    List { index: usize },
}

/// One drag gesture, from pick-up to drop.
#[derive(Debug)]
pub struct DragSession {
    item: DragItem,
    origin: Origin,
}

impl DragSession {
    /// Pick up an item. Returns `None` if the mirror does not contain it.
    pub fn start(mirror: &BoardMirror, item: DragItem) -> Option<Self> {
        let origin = match item {
            DragItem::Task(id) => {
                let (list_id, index) = mirror.task_slot(id)?;
                Origin::Task { list_id, index }
            }
            DragItem::List(id) => Origin::List {
                index: mirror.list_index(id)?,
            },
        };
        Some(Self { item, origin })
    }

    pub fn item(&self) -> DragItem {
        self.item
    }

    /// Speculatively rearrange the mirror for the current hover target.
    pub fn hover(&self, mirror: &mut BoardMirror, over: DropTarget) {
        match (self.item, over) {
            (DragItem::Task(id), DropTarget::Task(over_id)) if id != over_id => {
                // Take the hovered card's slot; it shifts to make room.
                if let Some((list_id, index)) = mirror.task_slot(over_id) {
                    mirror.place_task(id, list_id, index);
                }
            }
            (DragItem::Task(id), DropTarget::List(list_id)) => {
                let already_there = mirror.task(id).is_some_and(|t| t.list_id == list_id);
                if !already_there && mirror.list(list_id).is_some() {
                    mirror.place_task(id, list_id, usize::MAX);
                }
            }
            (DragItem::List(id), DropTarget::List(over_id)) if id != over_id => {
                if let Some(index) = mirror.list_index(over_id) {
                    mirror.place_list(id, index);
                }
            }
            _ => {}
        }
    }

    /// Finish the drag where the last [`hover`](Self::hover) left it.
    pub fn drop(self, mirror: &mut BoardMirror) -> DropOutcome {
        match (self.item, self.origin) {
            (DragItem::Task(id), Origin::Task { list_id, index }) => {
                let Some((final_list, final_index)) = mirror.task_slot(id) else {
                    // Deleted by someone else mid-drag.
                    return DropOutcome::Cancelled;
                };
                if final_list == list_id && final_index == index {
                    return DropOutcome::Unchanged;
                }

                let position = Position::try_from(final_index).unwrap_or(Position::MAX);
                mirror.set_task_position(id, position);
                DropOutcome::MoveTask {
                    task_id: id,
                    placement: TaskPlacement {
                        list_id: final_list,
                        position,
                    },
                }
            }
            (DragItem::List(id), Origin::List { index }) => {
                if mirror.list_index(id) == Some(index) {
                    return DropOutcome::Unchanged;
                }
                DropOutcome::ListsReordered(mirror.lists().iter().map(|l| l.id).collect())
            }
            _ => DropOutcome::Unchanged,
        }
    }

    /// Abandon the drag (released outside the board) and put the item back
    /// where it was picked up.
    pub fn cancel(self, mirror: &mut BoardMirror) -> DropOutcome {
        self.restore(mirror);
        DropOutcome::Cancelled
    }

    fn restore(&self, mirror: &mut BoardMirror) {
        match (self.item, self.origin) {
            (DragItem::Task(id), Origin::Task { list_id, index }) => {
                mirror.place_task(id, list_id, index);
            }
            (DragItem::List(id), Origin::List { index }) => {
                mirror.place_list(id, index);
            }
            _ => {}
        }
    }
}
