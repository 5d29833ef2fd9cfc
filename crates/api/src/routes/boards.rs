use axum::routing::{get, post};
use axum::Router;

use crate::handlers::boards;
use crate::state::AppState;

/// Board routes mounted at `/boards`.
///
/// ```text
/// GET    /                    -> list_boards
/// POST   /                    -> create_board
/// GET    /{id}                -> get_board
/// PUT    /{id}                -> update_board
/// DELETE /{id}                -> delete_board
/// POST   /{id}/members        -> add_member
/// GET    /{id}/activities     -> list_activities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(boards::list_boards).post(boards::create_board))
        .route(
            "/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/{id}/members", post(boards::add_member))
        .route("/{id}/activities", get(boards::list_activities))
}
