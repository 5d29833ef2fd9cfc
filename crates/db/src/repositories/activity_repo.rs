//! Repository for the append-only `activities` table.

use sqlx::PgPool;
use taskboard_core::board::Activity;
use taskboard_core::types::DbId;

use crate::decode_error;
use crate::models::activity::{ActivityRow, CreateActivity};

/// Column list for activity reads, joined with `users` as `u`.
const COLUMNS: &str = "a.id, a.user_id, u.username, a.board_id, a.type AS activity_type, \
                       a.content, a.task_id, a.created_at";

/// Provides insert and feed queries for activities. Rows are never updated.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a record, returning its id.
    pub async fn create(pool: &PgPool, input: &CreateActivity) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO activities (user_id, board_id, type, content, task_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(input.board_id)
        .bind(input.activity_type.as_str())
        .bind(&input.content)
        .bind(input.task_id)
        .fetch_one(pool)
        .await
    }

    /// Find one record with the acting user's username resolved.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities a JOIN users u ON u.id = a.user_id WHERE a.id = $1"
        );
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Activity::try_from).transpose().map_err(decode_error)
    }

    /// The most recent `limit` records for a board, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        board_id: DbId,
        limit: i64,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activities a JOIN users u ON u.id = a.user_id \
             WHERE a.board_id = $1 \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(board_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        rows.into_iter()
            .map(|row| Activity::try_from(row).map_err(decode_error))
            .collect()
    }
}
