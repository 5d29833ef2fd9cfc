//! Repository for the `lists` table.

use sqlx::PgPool;
use taskboard_core::board::List;
use taskboard_core::position::Position;
use taskboard_core::types::DbId;

use crate::models::list::ListRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, board_id, position, created_at";

/// Provides CRUD operations for lists.
pub struct ListRepo;

impl ListRepo {
    /// Number of lists currently on a board.
    pub async fn count_in_board(pool: &PgPool, board_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lists WHERE board_id = $1")
            .bind(board_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a list at the given position.
    pub async fn create(
        pool: &PgPool,
        board_id: DbId,
        title: &str,
        position: Position,
    ) -> Result<List, sqlx::Error> {
        let query = format!(
            "INSERT INTO lists (title, board_id, position) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListRow>(&query)
            .bind(title)
            .bind(board_id)
            .bind(position)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<List>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE id = $1");
        let row = sqlx::query_as::<_, ListRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(List::from))
    }

    /// All lists on a board in display order.
    pub async fn list_for_board(pool: &PgPool, board_id: DbId) -> Result<Vec<List>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lists WHERE board_id = $1 ORDER BY position, id"
        );
        let rows = sqlx::query_as::<_, ListRow>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(List::from).collect())
    }

    /// Rename and/or reposition a list. Siblings are not renumbered.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        title: Option<&str>,
        position: Option<Position>,
    ) -> Result<Option<List>, sqlx::Error> {
        let query = format!(
            "UPDATE lists SET \
                title = COALESCE($2, title), \
                position = COALESCE($3, position), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListRow>(&query)
            .bind(id)
            .bind(title)
            .bind(position)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(List::from))
    }

    /// Delete a list and every task in it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
