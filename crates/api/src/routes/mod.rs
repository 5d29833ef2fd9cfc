pub mod boards;
pub mod health;
pub mod lists;
pub mod tasks;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (optional ?token=)
///
/// /boards                              list, create
/// /boards/{id}                         get snapshot, rename, delete
/// /boards/{id}/members                 add member (POST)
/// /boards/{id}/activities              activity feed (GET)
///
/// /lists                               create
/// /lists/{id}                          update, delete
///
/// /tasks                               create
/// /tasks/{id}                          update / move, delete
///
/// /users                               list
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/boards", boards::router())
        .nest("/lists", lists::router())
        .nest("/tasks", tasks::router())
        .nest("/users", users::router())
}
