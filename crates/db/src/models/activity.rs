//! Activity rows.

use sqlx::FromRow;
use taskboard_core::activity::ActivityType;
use taskboard_core::board::Activity;
use taskboard_core::error::CoreError;
use taskboard_core::types::{DbId, Timestamp};

/// A row from `activities` joined with the acting user's username.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub board_id: DbId,
    pub activity_type: String,
    pub content: String,
    pub task_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = CoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            board_id: row.board_id,
            activity_type: row.activity_type.parse()?,
            content: row.content,
            task_id: row.task_id,
            created_at: row.created_at,
        })
    }
}

/// Values for a new activity record.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub user_id: DbId,
    pub board_id: DbId,
    pub activity_type: ActivityType,
    pub content: String,
    pub task_id: Option<DbId>,
}
