//! Activity types, task-update classification, and feed wording.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of activities returned for a board feed, and kept by clients.
pub const ACTIVITY_FEED_LIMIT: usize = 50;

/// Closed set of audit record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskMoved,
    MemberAssigned,
    ListCreated,
    ListUpdated,
    ListDeleted,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::TaskCreated,
        ActivityType::TaskUpdated,
        ActivityType::TaskDeleted,
        ActivityType::TaskMoved,
        ActivityType::MemberAssigned,
        ActivityType::ListCreated,
        ActivityType::ListUpdated,
        ActivityType::ListDeleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::TaskCreated => "task_created",
            ActivityType::TaskUpdated => "task_updated",
            ActivityType::TaskDeleted => "task_deleted",
            ActivityType::TaskMoved => "task_moved",
            ActivityType::MemberAssigned => "member_assigned",
            ActivityType::ListCreated => "list_created",
            ActivityType::ListUpdated => "list_updated",
            ActivityType::ListDeleted => "list_deleted",
        }
    }

    /// Human-readable feed line for an entity with the given title.
    ///
    /// The acting user's name is prepended by the client when rendering.
    pub fn describe(self, title: &str) -> String {
        match self {
            ActivityType::TaskCreated => format!("created task \"{title}\""),
            ActivityType::TaskUpdated => format!("updated task \"{title}\""),
            ActivityType::TaskDeleted => format!("deleted task \"{title}\""),
            ActivityType::TaskMoved => format!("moved task \"{title}\""),
            ActivityType::MemberAssigned => format!("updated assignees for \"{title}\""),
            ActivityType::ListCreated => format!("added column \"{title}\""),
            ActivityType::ListUpdated => format!("renamed column to \"{title}\""),
            ActivityType::ListDeleted => format!("removed column \"{title}\""),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown activity type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Task update classification
// ---------------------------------------------------------------------------

/// Which parts of a task an update call touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// `list_id` was supplied and differs from the task's current list.
    pub list_changed: bool,
    /// `position` was supplied (any value, even the current one).
    pub position_supplied: bool,
    /// `assignees` was supplied.
    pub assignees_supplied: bool,
}

impl TaskChanges {
    pub fn is_move(&self) -> bool {
        self.list_changed || self.position_supplied
    }
}

/// Exactly one activity per update: move, then assignment, then generic.
pub fn classify_task_update(changes: &TaskChanges) -> ActivityType {
    if changes.is_move() {
        ActivityType::TaskMoved
    } else if changes.assignees_supplied {
        ActivityType::MemberAssigned
    } else {
        ActivityType::TaskUpdated
    }
}
