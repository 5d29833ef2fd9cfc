//! Handlers for boards, their membership, and their activity feed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use taskboard_core::activity::ACTIVITY_FEED_LIMIT;
use taskboard_core::board::{normalize_title, BoardSnapshot};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::board::{AddMember, CreateBoard, UpdateBoard};
use taskboard_db::repositories::{ActivityRepo, BoardRepo, ListRepo, TaskRepo, UserRepo};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::handlers::{board_for_member, board_for_owner};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/boards
///
/// Boards the caller owns or is a member of.
pub async fn list_boards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let boards = BoardRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: boards }))
}

/// POST /api/v1/boards
pub async fn create_board(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBoard>,
) -> AppResult<impl IntoResponse> {
    let title = normalize_title("title", &input.title)?;
    let board = BoardRepo::create(&state.pool, auth.user_id, &title).await?;

    tracing::info!(board_id = board.id, user_id = auth.user_id, "Board created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: board })))
}

/// GET /api/v1/boards/{id}
///
/// Everything a client needs to open the board: lists and tasks in display
/// order, plus the newest activities.
pub async fn get_board(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let board = board_for_member(&state.pool, id, auth.user_id).await?;

    let lists = ListRepo::list_for_board(&state.pool, id).await?;
    let tasks = TaskRepo::list_for_board(&state.pool, id).await?;
    let activities = ActivityRepo::list_recent(&state.pool, id, ACTIVITY_FEED_LIMIT as i64).await?;

    Ok(Json(DataResponse {
        data: BoardSnapshot {
            board,
            lists,
            tasks,
            activities,
        },
    }))
}

/// PUT /api/v1/boards/{id}
///
/// Rename a board. Owner only.
pub async fn update_board(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateBoard>,
) -> AppResult<impl IntoResponse> {
    let board = board_for_owner(&state.pool, id, auth.user_id).await?;

    let Some(title) = input.title else {
        return Ok(Json(DataResponse { data: board }));
    };
    let title = normalize_title("title", &title)?;

    let board = BoardRepo::update_title(&state.pool, id, &title)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Board",
            id,
        })?;

    tracing::info!(board_id = id, user_id = auth.user_id, "Board renamed");
    Ok(Json(DataResponse { data: board }))
}

/// DELETE /api/v1/boards/{id}
///
/// Owner only. Lists, tasks and memberships go with the board; its
/// activity records stay behind.
pub async fn delete_board(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    board_for_owner(&state.pool, id, auth.user_id).await?;

    if !BoardRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound {
            entity: "Board",
            id,
        }
        .into());
    }

    tracing::info!(board_id = id, user_id = auth.user_id, "Board deleted");
    Ok(Json(DataResponse::deleted()))
}

/// POST /api/v1/boards/{id}/members
///
/// Owner adds a member. Adding an existing member is a no-op.
pub async fn add_member(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<AddMember>,
) -> AppResult<impl IntoResponse> {
    board_for_owner(&state.pool, id, auth.user_id).await?;

    if UserRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }
        .into());
    }

    let added = BoardRepo::add_member(&state.pool, id, input.user_id).await?;
    if added {
        tracing::info!(board_id = id, member_id = input.user_id, "Board member added");
    }

    let board = BoardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Board",
            id,
        })?;
    Ok(Json(DataResponse { data: board }))
}

/// GET /api/v1/boards/{id}/activities
///
/// The newest activities on the board, newest first.
pub async fn list_activities(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    board_for_member(&state.pool, id, auth.user_id).await?;

    let activities = ActivityRepo::list_recent(&state.pool, id, ACTIVITY_FEED_LIMIT as i64).await?;
    Ok(Json(DataResponse { data: activities }))
}
