//! Board, list, task and activity shapes as they travel over the wire.
//!
//! These are the canonical entity shapes returned by the HTTP handlers,
//! carried inside broadcast events, and held by the client mirror.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::error::CoreError;
use crate::position::{Position, Positioned};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority. Serialized with its capitalized name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: Low, Medium, High"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A board header. Lists, tasks and activities are fetched alongside it in a
/// [`BoardSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: DbId,
    pub title: String,
    pub owner_id: DbId,
    /// Member user ids, owner included.
    pub members: Vec<DbId>,
    pub created_at: Timestamp,
}

impl Board {
    /// Owner or member.
    pub fn is_accessible_by(&self, user_id: DbId) -> bool {
        self.owner_id == user_id || self.members.contains(&user_id)
    }
}

/// An ordered column of tasks on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: DbId,
    pub title: String,
    pub board_id: DbId,
    pub position: Position,
    pub created_at: Timestamp,
}

/// A user reference embedded in a task's `assignees`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: DbId,
    pub username: String,
}

/// A task card. `board_id` is denormalized so broadcasts can be routed
/// without looking up the owning list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub list_id: DbId,
    pub board_id: DbId,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub position: Position,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    pub created_at: Timestamp,
}

impl Task {
    /// Ids of the current assignees, in display order.
    pub fn assignee_ids(&self) -> Vec<DbId> {
        self.assignees.iter().map(|a| a.id).collect()
    }
}

/// One audit record in a board's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: DbId,
    pub user_id: DbId,
    /// Display name of the acting user, resolved at read time.
    pub username: String,
    pub board_id: DbId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub content: String,
    pub task_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A user currently connected to a board room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub id: DbId,
    pub username: String,
}

/// Everything a client needs to seed its mirror when opening a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub lists: Vec<List>,
    pub tasks: Vec<Task>,
    pub activities: Vec<Activity>,
}

impl Positioned for List {
    fn id(&self) -> DbId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }
}

impl Positioned for Task {
    fn id(&self) -> DbId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Trim a user-supplied title, rejecting empty or whitespace-only input.
pub fn normalize_title(field: &str, title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
