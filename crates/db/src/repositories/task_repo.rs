//! Repository for the `tasks` and `task_assignees` tables.
//!
//! Reads always return the wire-shaped [`Task`] with `assignees` resolved to
//! `{id, username}` pairs ordered by username.

use std::collections::HashMap;

use sqlx::PgPool;
use taskboard_core::board::{Assignee, Task};
use taskboard_core::position::Position;
use taskboard_core::types::DbId;

use crate::decode_error;
use crate::models::task::{AssigneeRow, CreateTask, TaskFieldUpdate, TaskRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, list_id, board_id, priority, \
                       due_date, position, created_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Number of tasks currently in a list.
    pub async fn count_in_list(pool: &PgPool, list_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a task at the given position with no assignees.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        title: &str,
        position: Position,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, list_id, board_id, priority, due_date, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(title)
            .bind(&input.description)
            .bind(input.list_id)
            .bind(input.board_id)
            .bind(input.priority.as_str())
            .bind(input.due_date)
            .bind(position)
            .fetch_one(pool)
            .await?;
        row.into_task(Vec::new()).map_err(decode_error)
    }

    /// Find a task with its assignees.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_assignees(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// All tasks on a board in display order.
    pub async fn list_for_board(pool: &PgPool, board_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE board_id = $1 ORDER BY position, id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await?;
        Self::attach_assignees(pool, rows).await
    }

    /// Tasks in one list in display order.
    pub async fn list_for_list(pool: &PgPool, list_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE list_id = $1 ORDER BY position, id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(list_id)
            .fetch_all(pool)
            .await?;
        Self::attach_assignees(pool, rows).await
    }

    /// Apply an edit and/or move to a single task.
    ///
    /// Only the moved task is written; sibling positions are left as they
    /// are. The field update and the assignee replacement commit together.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TaskFieldUpdate<'_>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = CASE WHEN $3 THEN $4 ELSE description END, \
                priority = COALESCE($5, priority), \
                due_date = CASE WHEN $6 THEN $7 ELSE due_date END, \
                list_id = COALESCE($8, list_id), \
                position = COALESCE($9, position), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(input.title)
            .bind(input.description.is_some())
            .bind(input.description.flatten())
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.list_id)
            .bind(input.position)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if let Some(assignees) = input.assignees {
            sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO task_assignees (task_id, user_id) \
                 SELECT $1, user_id FROM UNNEST($2::BIGINT[]) AS user_id \
                 ON CONFLICT (task_id, user_id) DO NOTHING",
            )
            .bind(id)
            .bind(assignees)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Self::attach_assignees(pool, vec![row]).await?.pop())
    }

    /// Delete a task. Returns `false` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve assignees for a batch of rows in one query, preserving row order.
    async fn attach_assignees(pool: &PgPool, rows: Vec<TaskRow>) -> Result<Vec<Task>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let assignee_rows = sqlx::query_as::<_, AssigneeRow>(
            "SELECT ta.task_id, u.id AS user_id, u.username \
             FROM task_assignees ta \
             JOIN users u ON u.id = ta.user_id \
             WHERE ta.task_id = ANY($1) \
             ORDER BY u.username, u.id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_task: HashMap<DbId, Vec<Assignee>> = HashMap::new();
        for a in assignee_rows {
            by_task.entry(a.task_id).or_default().push(Assignee {
                id: a.user_id,
                username: a.username,
            });
        }

        rows.into_iter()
            .map(|row| {
                let assignees = by_task.remove(&row.id).unwrap_or_default();
                row.into_task(assignees).map_err(decode_error)
            })
            .collect()
    }
}
