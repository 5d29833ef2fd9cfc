//! End-to-end sync against a real server bound to a local port.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::PgPool;
use taskboard_api::auth::jwt::{generate_access_token, JwtConfig};
use taskboard_api::config::ServerConfig;
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_api::ws::RoomBroadcaster;
use taskboard_client::api::NewTask;
use taskboard_client::connection::open_board;
use taskboard_client::{
    BoardApi, BoardConnection, ClientConfig, ClientError, DragItem, DragSession, DropOutcome,
    DropTarget,
};
use taskboard_core::activity::ActivityType;
use taskboard_core::board::PresenceUser;
use taskboard_core::protocol::BoardEvent;
use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::UserRepo;

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "client-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Start the full server on an ephemeral port and return its origin.
async fn spawn_server(pool: PgPool) -> String {
    let state = AppState::new(pool, server_config());
    tokio::spawn(
        RoomBroadcaster::new(Arc::clone(&state.presence)).run(state.event_bus.subscribe()),
    );
    let app = build_app_router(state, &server_config());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn seed_user(pool: &PgPool, username: &str) -> PresenceUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .unwrap();
    PresenceUser {
        id: user.id,
        username: user.username,
    }
}

fn client_config(origin: &str, user: &PresenceUser) -> ClientConfig {
    let token = generate_access_token(user.id, &server_config().jwt).unwrap();
    ClientConfig::for_server(origin, token)
}

async fn next_event(conn: &mut BoardConnection) -> BoardEvent {
    tokio::time::timeout(Duration::from_secs(5), conn.next_event())
        .await
        .expect("timed out waiting for a board event")
        .unwrap()
        .expect("socket closed")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_peer_sees_changes_and_persists_its_own_drag(pool: PgPool) {
    let ada = seed_user(&pool, "ada").await;
    let bo = seed_user(&pool, "bo").await;
    let origin = spawn_server(pool).await;

    let ada_api = BoardApi::new(&client_config(&origin, &ada));
    let board = ada_api.create_board("Sprint 1").await.unwrap();
    ada_api.add_member(board.id, bo.id).await.unwrap();
    let todo = ada_api.create_list(board.id, "Todo").await.unwrap();
    let done = ada_api.create_list(board.id, "Done").await.unwrap();

    let bo_config = client_config(&origin, &bo);
    let bo_api = BoardApi::new(&bo_config);
    let (mut mirror, mut conn) = open_board(&bo_api, &bo_config, board.id, bo.clone())
        .await
        .unwrap();
    assert_eq!(mirror.lists().len(), 2);
    assert_eq!(mirror.activities().len(), 2);

    // Joining announces the roster.
    let event = next_event(&mut conn).await;
    assert_matches!(&event, BoardEvent::PresenceUpdate(users) if users == &vec![bo.clone()]);
    mirror.apply(board.id, event);

    // A change made by someone else arrives as task_created + activity_logged.
    let task = ada_api
        .create_task(&NewTask {
            title: "Write docs".into(),
            list_id: todo.id,
            board_id: board.id,
            description: None,
            priority: None,
            due_date: None,
        })
        .await
        .unwrap();
    for _ in 0..2 {
        let event = next_event(&mut conn).await;
        mirror.apply(board.id, event);
    }
    assert_eq!(mirror.task(task.id), Some(&task));
    assert_eq!(mirror.activities()[0].activity_type, ActivityType::TaskCreated);

    // Drag it to Done and persist the drop.
    let drag = DragSession::start(&mirror, DragItem::Task(task.id)).unwrap();
    drag.hover(&mut mirror, DropTarget::List(done.id));
    let DropOutcome::MoveTask { task_id, placement } = drag.drop(&mut mirror) else {
        panic!("expected a task move");
    };
    let moved = bo_api.move_task(task_id, placement).await.unwrap();
    assert_eq!(moved.list_id, done.id);
    assert_eq!(moved.position, 0);
    assert_eq!(moved.board_id, board.id);

    // The echo of our own move merges cleanly.
    for _ in 0..2 {
        let event = next_event(&mut conn).await;
        mirror.apply(board.id, event);
    }
    assert_eq!(mirror.task(task.id), Some(&moved));
    assert_eq!(mirror.activities()[0].activity_type, ActivityType::TaskMoved);
    assert_eq!(mirror.activities()[0].username, "bo");

    let snapshot = ada_api.get_board(board.id).await.unwrap();
    assert_eq!(snapshot.tasks, vec![moved]);

    conn.leave().await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_api_errors_carry_status_and_message(pool: PgPool) {
    let ada = seed_user(&pool, "ada").await;
    let origin = spawn_server(pool).await;
    let api = BoardApi::new(&client_config(&origin, &ada));

    let err = api.get_board(999_999).await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 404, .. });

    let err = api.create_board("   ").await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 400, ref message } if !message.is_empty());
}
