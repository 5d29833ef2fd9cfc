pub mod boards;
pub mod lists;
pub mod tasks;
pub mod users;

use taskboard_core::board::Board;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::repositories::BoardRepo;
use taskboard_db::DbPool;

use crate::error::AppResult;

/// Load a board the user owns or belongs to.
///
/// Missing boards are `NotFound`; boards the user cannot access are
/// `Unauthorized`.
pub(crate) async fn board_for_member(
    pool: &DbPool,
    board_id: DbId,
    user_id: DbId,
) -> AppResult<Board> {
    let board = BoardRepo::find_by_id(pool, board_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        })?;

    if !board.is_accessible_by(user_id) {
        tracing::debug!(board_id, user_id, "Board access denied");
        return Err(CoreError::not_board_member(board_id).into());
    }
    Ok(board)
}

/// Load a board for an owner-only action. Members who are not the owner
/// get `Forbidden`.
pub(crate) async fn board_for_owner(
    pool: &DbPool,
    board_id: DbId,
    user_id: DbId,
) -> AppResult<Board> {
    let board = board_for_member(pool, board_id, user_id).await?;
    if board.owner_id != user_id {
        return Err(CoreError::Forbidden(format!(
            "Only the owner may modify board {board_id}"
        ))
        .into());
    }
    Ok(board)
}
