//! Handlers for tasks.
//!
//! Every successful mutation is broadcast to the board's room first and
//! then recorded in the activity log. An update records exactly one
//! activity, classified as a move, an assignment, or a plain edit.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use taskboard_core::activity::{classify_task_update, ActivityType, TaskChanges};
use taskboard_core::assignees::dedup_assignees;
use taskboard_core::board::normalize_title;
use taskboard_core::error::CoreError;
use taskboard_core::position::{append_position, ensure_same_board, validate_position};
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;
use taskboard_db::models::task::{CreateTask, TaskFieldUpdate, UpdateTask};
use taskboard_db::repositories::{ListRepo, TaskRepo, UserRepo};
use taskboard_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::handlers::board_for_member;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tasks
///
/// Appends a task to the end of its list. The list must belong to the
/// given board.
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<impl IntoResponse> {
    let title = normalize_title("title", &input.title)?;
    board_for_member(&state.pool, input.board_id, auth.user_id).await?;

    let list = ListRepo::find_by_id(&state.pool, input.list_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "List",
            id: input.list_id,
        })?;
    ensure_same_board(input.board_id, list.board_id)?;

    let count = TaskRepo::count_in_list(&state.pool, list.id).await?;
    let task = TaskRepo::create(&state.pool, &input, &title, append_position(count)).await?;

    tracing::info!(
        task_id = task.id,
        list_id = task.list_id,
        board_id = task.board_id,
        position = task.position,
        "Task created"
    );

    state
        .event_bus
        .emit(task.board_id, BoardEvent::TaskCreated(task.clone()));
    state
        .activity
        .record_for(
            auth.user_id,
            task.board_id,
            ActivityType::TaskCreated,
            &task.title,
            Some(task.id),
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// PUT /api/v1/tasks/{id}
///
/// Edit fields, replace the assignee set, and/or move the task. A move
/// writes the new `(list_id, position)` to this task only; the target list
/// must be on the same board.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    let existing = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;
    board_for_member(&state.pool, existing.board_id, auth.user_id).await?;

    let title = input
        .title
        .as_deref()
        .map(|t| normalize_title("title", t))
        .transpose()?;

    let target_list = match input.list_id {
        Some(list_id) if list_id != existing.list_id => {
            let list = ListRepo::find_by_id(&state.pool, list_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "List",
                    id: list_id,
                })?;
            ensure_same_board(existing.board_id, list.board_id)?;
            Some(list.id)
        }
        _ => None,
    };

    if let Some(position) = input.position {
        validate_position(position)?;
    }

    let assignees = match &input.assignees {
        Some(ids) => Some(checked_assignees(&state.pool, ids).await?),
        None => None,
    };

    let changes = TaskChanges {
        list_changed: target_list.is_some(),
        position_supplied: input.position.is_some(),
        assignees_supplied: assignees.is_some(),
    };

    let update = TaskFieldUpdate {
        title: title.as_deref(),
        description: input.description.as_ref().map(|d| d.as_deref()),
        priority: input.priority,
        due_date: input.due_date,
        list_id: target_list,
        position: input.position,
        assignees: assignees.as_deref(),
    };

    let task = TaskRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;

    let activity_type = classify_task_update(&changes);
    tracing::info!(
        task_id = id,
        board_id = task.board_id,
        list_id = task.list_id,
        position = task.position,
        kind = %activity_type,
        "Task updated"
    );

    state
        .event_bus
        .emit(task.board_id, BoardEvent::TaskUpdated(task.clone()));
    state
        .activity
        .record_for(
            auth.user_id,
            task.board_id,
            activity_type,
            &task.title,
            Some(task.id),
        )
        .await;

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;
    board_for_member(&state.pool, task.board_id, auth.user_id).await?;

    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Task", id }.into());
    }

    tracing::info!(task_id = id, board_id = task.board_id, "Task deleted");

    state
        .event_bus
        .emit(task.board_id, BoardEvent::TaskDeleted(id));
    // The record outlives the task, so it carries no task reference.
    state
        .activity
        .record_for(auth.user_id, task.board_id, ActivityType::TaskDeleted, &task.title, None)
        .await;

    Ok(Json(DataResponse::deleted()))
}

/// De-duplicate a requested assignee set and reject unknown user ids.
async fn checked_assignees(pool: &DbPool, ids: &[DbId]) -> AppResult<Vec<DbId>> {
    let ids = dedup_assignees(ids);
    let missing = UserRepo::find_missing(pool, &ids).await?;
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!("Unknown assignee ids: {missing:?}")).into());
    }
    Ok(ids)
}
