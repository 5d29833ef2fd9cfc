//! Task rows, assignee rows and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::board::{Assignee, Priority, Task};
use taskboard_core::error::CoreError;
use taskboard_core::position::Position;
use taskboard_core::types::{DbId, Timestamp};

use super::deserialize_some;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub list_id: DbId,
    pub board_id: DbId,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    pub position: Position,
    pub created_at: Timestamp,
}

impl TaskRow {
    /// Combine with the task's assignees into the wire shape.
    pub fn into_task(self, assignees: Vec<Assignee>) -> Result<Task, CoreError> {
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            list_id: self.list_id,
            board_id: self.board_id,
            priority: self.priority.parse()?,
            due_date: self.due_date,
            position: self.position,
            assignees,
            created_at: self.created_at,
        })
    }
}

/// One `(task, user)` pair from `task_assignees` joined with `users`.
#[derive(Debug, Clone, FromRow)]
pub struct AssigneeRow {
    pub task_id: DbId,
    pub user_id: DbId,
    pub username: String,
}

/// DTO for creating a task. The position is assigned by the server.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub list_id: DbId,
    pub board_id: DbId,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
}

/// DTO for editing or moving a task. Absent fields are left untouched;
/// `description` and `due_date` may be cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<Timestamp>>,
    /// Replacement assignee set. Older clients send this as `users`.
    #[serde(alias = "users")]
    pub assignees: Option<Vec<DbId>>,
    pub list_id: Option<DbId>,
    pub position: Option<Position>,
}

/// Column values written by [`TaskRepo::update`](crate::repositories::TaskRepo::update).
#[derive(Debug, Default)]
pub struct TaskFieldUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<Timestamp>>,
    pub list_id: Option<DbId>,
    pub position: Option<Position>,
    /// Replacement assignee set, already de-duplicated.
    pub assignees: Option<&'a [DbId]>,
}
