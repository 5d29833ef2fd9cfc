use std::sync::Arc;

use taskboard_events::{ActivityRecorder, EventBus};

use crate::config::ServerConfig;
use crate::ws::{PresenceTracker, WsManager};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taskboard_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Every open WebSocket connection, joined to a board or not.
    pub ws_manager: Arc<WsManager>,
    /// Board rooms and their presence rosters.
    pub presence: Arc<PresenceTracker>,
    /// Hand-off point from mutation handlers to the room broadcaster.
    pub event_bus: Arc<EventBus>,
    /// Mutation log writer.
    pub activity: ActivityRecorder,
}

impl AppState {
    /// Wire up fresh connection, presence and event services around `pool`.
    pub fn new(pool: taskboard_db::DbPool, config: ServerConfig) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let activity = ActivityRecorder::new(pool.clone(), Arc::clone(&event_bus));
        Self {
            pool,
            config: Arc::new(config),
            ws_manager: Arc::new(WsManager::new()),
            presence: Arc::new(PresenceTracker::new()),
            event_bus,
            activity,
        }
    }
}
