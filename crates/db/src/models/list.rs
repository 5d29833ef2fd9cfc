//! List rows and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::board::List;
use taskboard_core::position::Position;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `lists` table.
#[derive(Debug, Clone, FromRow)]
pub struct ListRow {
    pub id: DbId,
    pub title: String,
    pub board_id: DbId,
    pub position: Position,
    pub created_at: Timestamp,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        List {
            id: row.id,
            title: row.title,
            board_id: row.board_id,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

/// DTO for creating a list. The position is assigned by the server.
#[derive(Debug, Deserialize)]
pub struct CreateList {
    pub title: String,
    pub board_id: DbId,
}

/// DTO for renaming or repositioning a list.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateList {
    pub title: Option<String>,
    pub position: Option<Position>,
}
