//! Board rows and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::board::Board;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow)]
pub struct BoardRow {
    pub id: DbId,
    pub title: String,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BoardRow {
    /// Attach the member list loaded from `board_members`.
    pub fn into_board(self, members: Vec<DbId>) -> Board {
        Board {
            id: self.id,
            title: self.title,
            owner_id: self.owner_id,
            members,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a board.
#[derive(Debug, Deserialize)]
pub struct CreateBoard {
    pub title: String,
}

/// DTO for renaming a board.
#[derive(Debug, Deserialize)]
pub struct UpdateBoard {
    pub title: Option<String>,
}

/// DTO for adding a member to a board.
#[derive(Debug, Deserialize)]
pub struct AddMember {
    pub user_id: DbId,
}
