//! Repository for the `boards` and `board_members` tables.

use sqlx::PgPool;
use taskboard_core::board::Board;
use taskboard_core::types::DbId;

use crate::models::board::BoardRow;

/// Column list for `boards` queries.
const COLUMNS: &str = "id, title, owner_id, created_at, updated_at";

/// Provides CRUD operations for boards and their membership.
pub struct BoardRepo;

impl BoardRepo {
    /// Create a board and register its owner as the first member.
    pub async fn create(pool: &PgPool, owner_id: DbId, title: &str) -> Result<Board, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO boards (title, owner_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(title)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO board_members (board_id, user_id) VALUES ($1, $2)")
            .bind(row.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into_board(vec![owner_id]))
    }

    /// Find a board with its member list.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = $1");
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let members = Self::members(pool, row.id).await?;
                Ok(Some(row.into_board(members)))
            }
            None => Ok(None),
        }
    }

    /// Boards the user owns or belongs to, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM boards \
             WHERE owner_id = $1 \
                OR id IN (SELECT board_id FROM board_members WHERE user_id = $1) \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, BoardRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let mut boards = Vec::with_capacity(rows.len());
        for row in rows {
            let members = Self::members(pool, row.id).await?;
            boards.push(row.into_board(members));
        }
        Ok(boards)
    }

    /// Member user ids, in the order they joined.
    pub async fn members(pool: &PgPool, board_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM board_members WHERE board_id = $1 ORDER BY created_at, user_id",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Add a member. Returns `false` if the user was already a member.
    pub async fn add_member(
        pool: &PgPool,
        board_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO board_members (board_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (board_id, user_id) DO NOTHING",
        )
        .bind(board_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rename a board. Returns `None` if it does not exist.
    pub async fn update_title(
        pool: &PgPool,
        id: DbId,
        title: &str,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET title = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(id)
            .bind(title)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let members = Self::members(pool, row.id).await?;
                Ok(Some(row.into_board(members)))
            }
            None => Ok(None),
        }
    }

    /// Delete a board. Lists, tasks and memberships cascade; activities stay.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
