//! Mutation log.
//!
//! [`ActivityRecorder`] writes one audit record per committed mutation,
//! re-reads it with the acting user's username resolved, and publishes it
//! to the board's room as `activity_logged`. Recording is best-effort: a
//! failure is logged and never reaches the caller, so the mutation that
//! triggered it is unaffected.

use std::sync::Arc;

use taskboard_core::activity::ActivityType;
use taskboard_core::board::Activity;
use taskboard_core::protocol::BoardEvent;
use taskboard_core::types::DbId;
use taskboard_db::models::activity::CreateActivity;
use taskboard_db::repositories::ActivityRepo;
use taskboard_db::DbPool;

use crate::bus::EventBus;

/// Appends activities and announces them on the [`EventBus`].
#[derive(Clone)]
pub struct ActivityRecorder {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl ActivityRecorder {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Record an activity and broadcast it to the board's room.
    ///
    /// Returns the stored record, or `None` if it could not be written.
    pub async fn record(
        &self,
        user_id: DbId,
        board_id: DbId,
        activity_type: ActivityType,
        content: impl Into<String>,
        task_id: Option<DbId>,
    ) -> Option<Activity> {
        let input = CreateActivity {
            user_id,
            board_id,
            activity_type,
            content: content.into(),
            task_id,
        };

        match self.persist(&input).await {
            Ok(activity) => {
                self.bus
                    .emit(board_id, BoardEvent::ActivityLogged(activity.clone()));
                Some(activity)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    board_id,
                    user_id,
                    activity_type = %activity_type,
                    "Failed to record activity"
                );
                None
            }
        }
    }

    /// Record an activity whose content is the standard wording for
    /// `activity_type` applied to `title`.
    pub async fn record_for(
        &self,
        user_id: DbId,
        board_id: DbId,
        activity_type: ActivityType,
        title: &str,
        task_id: Option<DbId>,
    ) -> Option<Activity> {
        self.record(
            user_id,
            board_id,
            activity_type,
            activity_type.describe(title),
            task_id,
        )
        .await
    }

    async fn persist(&self, input: &CreateActivity) -> Result<Activity, sqlx::Error> {
        let id = ActivityRepo::create(&self.pool, input).await?;
        ActivityRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
