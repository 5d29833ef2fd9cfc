use axum::routing::{post, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Task routes mounted at `/tasks`.
///
/// ```text
/// POST   /        -> create_task
/// PUT    /{id}    -> update_task
/// DELETE /{id}    -> delete_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create_task))
        .route("/{id}", put(tasks::update_task).delete(tasks::delete_task))
}
