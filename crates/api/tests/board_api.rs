//! HTTP-level integration tests for boards, lists, tasks and the activity
//! feed.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, create, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;
use taskboard_core::protocol::BoardEvent;
use taskboard_db::repositories::{ActivityRepo, ListRepo, TaskRepo};

struct Fixture {
    pool: PgPool,
    state: taskboard_api::state::AppState,
    token: String,
    board_id: i64,
}

impl Fixture {
    async fn new(pool: PgPool, username: &str, board_title: &str) -> Self {
        let user_id = common::seed_user(&pool, username).await;
        let token = common::token_for(user_id);
        let state = common::build_test_state(pool.clone());

        let board = create(
            common::build_test_app(state.clone()),
            "/api/v1/boards",
            &token,
            json!({ "title": board_title }),
        )
        .await;

        Self {
            pool,
            state,
            token,
            board_id: board["id"].as_i64().unwrap(),
        }
    }

    fn app(&self) -> axum::Router {
        common::build_test_app(self.state.clone())
    }

    async fn list(&self, title: &str) -> serde_json::Value {
        create(
            self.app(),
            "/api/v1/lists",
            &self.token,
            json!({ "title": title, "board_id": self.board_id }),
        )
        .await
    }

    async fn task(&self, list_id: i64, title: &str) -> serde_json::Value {
        create(
            self.app(),
            "/api/v1/tasks",
            &self.token,
            json!({ "title": title, "list_id": list_id, "board_id": self.board_id }),
        )
        .await
    }

    async fn snapshot(&self) -> serde_json::Value {
        let response = get(
            self.app(),
            &format!("/api/v1/boards/{}", self.board_id),
            &self.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["data"].clone()
    }
}

// ---------------------------------------------------------------------------
// Ordering and moves
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sprint_board_move_scenario(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Sprint 1").await;

    let todo = fx.list("Todo").await;
    let done = fx.list("Done").await;
    assert_eq!(todo["position"], 0);
    assert_eq!(done["position"], 1);

    let task = fx.task(todo["id"].as_i64().unwrap(), "Write docs").await;
    assert_eq!(task["position"], 0);
    assert_eq!(task["priority"], "Medium");

    let response = put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &fx.token,
        json!({ "list_id": done["id"], "position": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = fx.snapshot().await;
    let lists = snapshot["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0]["title"], "Todo");
    assert_eq!(lists[0]["position"], 0);
    assert_eq!(lists[1]["title"], "Done");
    assert_eq!(lists[1]["position"], 1);

    let tasks = snapshot["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write docs");
    assert_eq!(tasks[0]["list_id"], done["id"]);
    assert_eq!(tasks[0]["position"], 0);

    let activities = snapshot["activities"].as_array().unwrap();
    assert_eq!(activities[0]["type"], "task_moved");
    assert_eq!(activities[0]["content"], "moved task \"Write docs\"");
    assert_eq!(activities[0]["username"], "ada");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_tasks_append_in_insertion_order(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();

    for (n, title) in ["one", "two", "three"].iter().enumerate() {
        let task = fx.task(list_id, title).await;
        assert_eq!(task["position"], n as i64);
    }

    let tasks = fx.snapshot().await["tasks"].clone();
    let titles: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_does_not_renumber_siblings(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let first = fx.task(list_id, "first").await;
    let second = fx.task(list_id, "second").await;

    // Drop the second task on top of the first: both now sit at 0.
    let response = put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", second["id"]),
        &fx.token,
        json!({ "position": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let tasks = TaskRepo::list_for_list(&fx.pool, list_id).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.position == 0));
    // Ties fall back to id order.
    assert_eq!(tasks[0].id, first["id"].as_i64().unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cross_board_move_is_rejected(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Home").await;
    let home_list = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(home_list, "Stay put").await;

    let other = create(fx.app(), "/api/v1/boards", &fx.token, json!({ "title": "Away" })).await;
    let away_list = create(
        fx.app(),
        "/api/v1/lists",
        &fx.token,
        json!({ "title": "Elsewhere", "board_id": other["id"] }),
    )
    .await;

    let response = put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &fx.token,
        json!({ "list_id": away_list["id"], "position": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let stored = TaskRepo::find_by_id(&fx.pool, task["id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.list_id, home_list);
    assert_eq!(stored.board_id, fx.board_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_list_must_belong_to_board_on_create(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Home").await;
    let other = create(fx.app(), "/api/v1/boards", &fx.token, json!({ "title": "Away" })).await;
    let away_list = create(
        fx.app(),
        "/api/v1/lists",
        &fx.token,
        json!({ "title": "Elsewhere", "board_id": other["id"] }),
    )
    .await;

    let response = post_json(
        fx.app(),
        "/api/v1/tasks",
        &fx.token,
        json!({ "title": "Lost", "list_id": away_list["id"], "board_id": fx.board_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Assignment and activity classification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignment_toggle_records_member_assigned(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let bo = common::seed_user(&fx.pool, "bo").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(list_id, "Review").await;
    let uri = format!("/api/v1/tasks/{}", task["id"]);

    let response = put_json(fx.app(), &uri, &fx.token, json!({ "assignees": [bo, bo] })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["assignees"], json!([{ "id": bo, "username": "bo" }]));

    // Older clients send the set as `users`.
    let response = put_json(fx.app(), &uri, &fx.token, json!({ "users": [] })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["assignees"], json!([]));

    let activities = fx.snapshot().await["activities"].clone();
    let types: Vec<_> = activities
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec!["member_assigned", "member_assigned", "task_created", "list_created"]
    );
    assert_eq!(activities[0]["content"], "updated assignees for \"Review\"");
    assert_eq!(activities[0]["task_id"], task["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_with_assignees_is_classified_as_move(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let bo = common::seed_user(&fx.pool, "bo").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(list_id, "Ship").await;

    put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &fx.token,
        json!({ "assignees": [bo], "position": 3 }),
    )
    .await;

    let activities = fx.snapshot().await["activities"].clone();
    assert_eq!(activities[0]["type"], "task_moved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_plain_edit_is_task_updated(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(list_id, "Draft").await;

    let response = put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &fx.token,
        // Same list id is not a move.
        json!({ "title": "Final", "priority": "High", "description": "ready", "list_id": list_id }),
    )
    .await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["priority"], "High");
    assert_eq!(updated["description"], "ready");

    let activities = fx.snapshot().await["activities"].clone();
    assert_eq!(activities[0]["type"], "task_updated");
    assert_eq!(activities[0]["content"], "updated task \"Final\"");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_assignee_is_rejected(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(list_id, "Review").await;

    let response = put_json(
        fx.app(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &fx.token,
        json!({ "assignees": [424242] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_list_cascades_to_tasks(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list = fx.list("Doomed").await;
    let list_id = list["id"].as_i64().unwrap();
    fx.task(list_id, "a").await;
    fx.task(list_id, "b").await;

    let response = delete(fx.app(), &format!("/api/v1/lists/{list_id}"), &fx.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": { "deleted": true } }));

    assert!(TaskRepo::list_for_list(&fx.pool, list_id).await.unwrap().is_empty());
    let snapshot = fx.snapshot().await;
    assert!(snapshot["lists"].as_array().unwrap().is_empty());
    assert!(snapshot["tasks"].as_array().unwrap().is_empty());
    assert_eq!(snapshot["activities"][0]["type"], "list_deleted");
    assert_eq!(snapshot["activities"][0]["content"], "removed column \"Doomed\"");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_task_records_activity_without_task_ref(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    let task = fx.task(list_id, "Gone").await;

    let response = delete(fx.app(), &format!("/api/v1/tasks/{}", task["id"]), &fx.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete(fx.app(), &format!("/api/v1/tasks/{}", task["id"]), &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let activities = fx.snapshot().await["activities"].clone();
    assert_eq!(activities[0]["type"], "task_deleted");
    assert_eq!(activities[0]["content"], "deleted task \"Gone\"");
    assert!(activities[0]["task_id"].is_null());
}

// ---------------------------------------------------------------------------
// List and board edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_list_renames_and_repositions(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list = fx.list("Todo").await;
    let other = fx.list("Done").await;
    let mut rx = fx.state.event_bus.subscribe();

    let response = put_json(
        fx.app(),
        &format!("/api/v1/lists/{}", list["id"]),
        &fx.token,
        json!({ "title": "  Doing ", "position": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Doing");
    assert_eq!(updated["position"], 3);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.board_id, fx.board_id);
    assert_matches!(
        first.event,
        BoardEvent::ListUpdated(l) if l.title == "Doing" && l.position == 3
    );
    let second = rx.recv().await.unwrap();
    assert_matches!(
        second.event,
        BoardEvent::ActivityLogged(a) if a.content == "renamed column to \"Doing\""
    );

    // Sibling keeps its slot; reads order by position.
    let snapshot = fx.snapshot().await;
    let lists = snapshot["lists"].as_array().unwrap();
    assert_eq!(lists[0]["id"], other["id"]);
    assert_eq!(lists[0]["position"], 1);
    assert_eq!(lists[1]["title"], "Doing");
    assert_eq!(snapshot["activities"][0]["type"], "list_updated");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_list_rejects_negative_position(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let list = fx.list("Todo").await;
    let list_id = list["id"].as_i64().unwrap();

    let response = put_json(
        fx.app(),
        &format!("/api/v1/lists/{list_id}"),
        &fx.token,
        json!({ "position": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let stored = ListRepo::find_by_id(&fx.pool, list_id).await.unwrap().unwrap();
    assert_eq!(stored.position, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_renames_board(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Sprint 1").await;
    let uri = format!("/api/v1/boards/{}", fx.board_id);

    let response = put_json(fx.app(), &uri, &fx.token, json!({ "title": "Sprint 2" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Sprint 2");
    assert_eq!(fx.snapshot().await["board"]["title"], "Sprint 2");

    let response = put_json(fx.app(), &uri, &fx.token, json!({ "title": " " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_board_cascades_but_keeps_activity(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Retired").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();
    fx.task(list_id, "Left behind").await;
    let uri = format!("/api/v1/boards/{}", fx.board_id);

    let response = delete(fx.app(), &uri, &fx.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": { "deleted": true } }));

    assert!(ListRepo::list_for_board(&fx.pool, fx.board_id).await.unwrap().is_empty());
    assert!(TaskRepo::list_for_board(&fx.pool, fx.board_id).await.unwrap().is_empty());
    assert_eq!(get(fx.app(), &uri, &fx.token).await.status(), StatusCode::NOT_FOUND);

    let activities = ActivityRepo::list_recent(&fx.pool, fx.board_id, 50).await.unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].content, "created task \"Left behind\"");
}

// ---------------------------------------------------------------------------
// Access control and validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_is_unauthorized(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Private").await;
    let cy = common::seed_user(&fx.pool, "cy").await;
    let cy_token = common::token_for(cy);

    let response = get(fx.app(), &format!("/api/v1/boards/{}", fx.board_id), &cy_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        fx.app(),
        "/api/v1/lists",
        &cy_token,
        json!({ "title": "Sneaky", "board_id": fx.board_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_added_member_gains_access_but_not_ownership(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Shared").await;
    let bo = common::seed_user(&fx.pool, "bo").await;
    let bo_token = common::token_for(bo);
    let uri = format!("/api/v1/boards/{}", fx.board_id);

    let response = post_json(
        fx.app(),
        &format!("{uri}/members"),
        &fx.token,
        json!({ "user_id": bo }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let members = body_json(response).await["data"]["members"].clone();
    assert_eq!(members.as_array().unwrap().len(), 2);

    assert_eq!(get(fx.app(), &uri, &bo_token).await.status(), StatusCode::OK);
    assert_eq!(delete(fx.app(), &uri, &bo_token).await.status(), StatusCode::FORBIDDEN);

    let boards = body_json(get(fx.app(), "/api/v1/boards", &bo_token).await).await;
    assert_eq!(boards["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_board_is_not_found(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;

    let response = get(fx.app(), "/api/v1/boards/999999", &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_titles_are_rejected(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;

    let response = post_json(
        fx.app(),
        "/api/v1/lists",
        &fx.token,
        json!({ "title": "   ", "board_id": fx.board_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_field_is_a_json_validation_error(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;

    let response = post_json(
        fx.app(),
        "/api/v1/lists",
        &fx.token,
        json!({ "board_id": fx.board_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("title"));

    let response = put_json(
        fx.app(),
        &format!("/api/v1/boards/{}", fx.board_id),
        &fx.token,
        json!({ "title": 42 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_undecodable_requests_are_json_bad_requests(pool: PgPool) {
    use axum::body::Body;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::Request;
    use tower::ServiceExt;

    let fx = Fixture::new(pool, "ada", "Board").await;

    let response = get(fx.app(), "/api/v1/boards/abc", &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = delete(fx.app(), "/api/v1/tasks/not-a-number", &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/lists")
        .header(AUTHORIZATION, format!("Bearer {}", fx.token))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = fx.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_json_not_found(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;

    let response = get(fx.app(), "/api/v1/columns", &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "No route for /api/v1/columns");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_unauthorized(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = common::build_test_app(common::build_test_state(pool));
    let response = app
        .oneshot(Request::builder().uri("/api/v1/boards").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Broadcasts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mutation_emits_entity_event_then_activity(pool: PgPool) {
    let fx = Fixture::new(pool, "ada", "Board").await;
    let mut rx = fx.state.event_bus.subscribe();

    let list = fx.list("Todo").await;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.board_id, fx.board_id);
    assert_matches!(first.event, BoardEvent::ListCreated(l) if l.id == list["id"].as_i64().unwrap());

    let second = rx.recv().await.unwrap();
    assert_matches!(second.event, BoardEvent::ActivityLogged(a) if a.content == "added column \"Todo\"");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_room_member_receives_live_task_events(pool: PgPool) {
    use std::sync::Arc;

    use axum::extract::ws::Message;
    use taskboard_api::ws::RoomBroadcaster;
    use taskboard_core::board::PresenceUser;

    let fx = Fixture::new(pool, "ada", "Board").await;
    let list_id = fx.list("Todo").await["id"].as_i64().unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    fx.state
        .presence
        .join(fx.board_id, "watcher", PresenceUser { id: 1, username: "ada".into() }, tx)
        .await;
    let _presence = rx.recv().await;

    tokio::spawn(
        RoomBroadcaster::new(Arc::clone(&fx.state.presence)).run(fx.state.event_bus.subscribe()),
    );

    let task = fx.task(list_id, "Live").await;

    let mut names = Vec::new();
    for _ in 0..2 {
        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let Message::Text(text) = msg else {
            panic!("Expected text frame");
        };
        let event: BoardEvent = serde_json::from_str(text.as_str()).unwrap();
        if let BoardEvent::TaskCreated(t) = &event {
            assert_eq!(t.id, task["id"].as_i64().unwrap());
        }
        names.push(event.name());
    }
    assert_eq!(names, vec!["task_created", "activity_logged"]);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = common::build_test_app(common::build_test_state(pool));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["connections"], 0);
    assert_eq!(json["rooms"], 0);
}
