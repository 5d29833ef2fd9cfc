use axum::routing::{post, put};
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// List routes mounted at `/lists`.
///
/// ```text
/// POST   /        -> create_list
/// PUT    /{id}    -> update_list
/// DELETE /{id}    -> delete_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lists::create_list))
        .route("/{id}", put(lists::update_list).delete(lists::delete_list))
}
