//! Handlers for lists (board columns).
//!
//! Every successful mutation is broadcast to the board's room first and
//! then recorded in the activity log.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use taskboard_core::activity::ActivityType;
use taskboard_core::board::normalize_title;
use taskboard_core::error::CoreError;
use taskboard_core::position::{append_position, validate_position};
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;
use taskboard_db::models::list::{CreateList, UpdateList};
use taskboard_db::repositories::ListRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::handlers::board_for_member;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/lists
///
/// Appends a list to the end of the board.
pub async fn create_list(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateList>,
) -> AppResult<impl IntoResponse> {
    let title = normalize_title("title", &input.title)?;
    board_for_member(&state.pool, input.board_id, auth.user_id).await?;

    let count = ListRepo::count_in_board(&state.pool, input.board_id).await?;
    let list = ListRepo::create(&state.pool, input.board_id, &title, append_position(count)).await?;

    tracing::info!(
        list_id = list.id,
        board_id = list.board_id,
        position = list.position,
        "List created"
    );

    state
        .event_bus
        .emit(list.board_id, BoardEvent::ListCreated(list.clone()));
    state
        .activity
        .record_for(auth.user_id, list.board_id, ActivityType::ListCreated, &list.title, None)
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// PUT /api/v1/lists/{id}
///
/// Rename and/or reposition a list. Sibling positions are not touched.
pub async fn update_list(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateList>,
) -> AppResult<impl IntoResponse> {
    let existing = ListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "List", id })?;
    board_for_member(&state.pool, existing.board_id, auth.user_id).await?;

    let title = input
        .title
        .as_deref()
        .map(|t| normalize_title("title", t))
        .transpose()?;
    if let Some(position) = input.position {
        validate_position(position)?;
    }

    let list = ListRepo::update(&state.pool, id, title.as_deref(), input.position)
        .await?
        .ok_or(CoreError::NotFound { entity: "List", id })?;

    tracing::info!(list_id = id, board_id = list.board_id, "List updated");

    state
        .event_bus
        .emit(list.board_id, BoardEvent::ListUpdated(list.clone()));
    state
        .activity
        .record_for(auth.user_id, list.board_id, ActivityType::ListUpdated, &list.title, None)
        .await;

    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/lists/{id}
///
/// Deletes the list together with every task in it.
pub async fn delete_list(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let list = ListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "List", id })?;
    board_for_member(&state.pool, list.board_id, auth.user_id).await?;

    if !ListRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "List", id }.into());
    }

    tracing::info!(list_id = id, board_id = list.board_id, "List deleted");

    state
        .event_bus
        .emit(list.board_id, BoardEvent::ListDeleted(id));
    state
        .activity
        .record_for(auth.user_id, list.board_id, ActivityType::ListDeleted, &list.title, None)
        .await;

    Ok(Json(DataResponse::deleted()))
}
