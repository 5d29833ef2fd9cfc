//! REST client for the board API.
//!
//! Every successful response is a `{"data": ...}` envelope; failures carry
//! `{"error": message, "code": CODE}` and surface as [`ClientError::Api`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_core::assignees::toggle_assignee;
use taskboard_core::board::{Board, BoardSnapshot, List, Priority, Task};
use taskboard_core::position::{Position, TaskPlacement};
use taskboard_core::types::{DbId, Timestamp};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// A user that can be added to a board or assigned to a task.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub list_id: DbId,
    pub board_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

/// Body of `PUT /tasks/{id}`. Absent fields are left unchanged.
///
/// `description` and `due_date` distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl From<TaskPlacement> for TaskPatch {
    fn from(placement: TaskPlacement) -> Self {
        Self {
            list_id: Some(placement.list_id),
            position: Some(placement.position),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct Deleted {
    deleted: bool,
}

/// HTTP client for one server, authenticated as one user.
pub struct BoardApi {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl BoardApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    // -- boards -------------------------------------------------------------

    pub async fn list_boards(&self) -> Result<Vec<Board>, ClientError> {
        self.send(self.client.get(self.url("/boards"))).await
    }

    pub async fn create_board(&self, title: &str) -> Result<Board, ClientError> {
        let body = serde_json::json!({ "title": title });
        self.send(self.client.post(self.url("/boards")).json(&body))
            .await
    }

    /// Fetch everything needed to seed a [`BoardMirror`](crate::BoardMirror).
    pub async fn get_board(&self, board_id: DbId) -> Result<BoardSnapshot, ClientError> {
        self.send(self.client.get(self.url(&format!("/boards/{board_id}"))))
            .await
    }

    pub async fn add_member(&self, board_id: DbId, user_id: DbId) -> Result<Board, ClientError> {
        let body = serde_json::json!({ "user_id": user_id });
        self.send(
            self.client
                .post(self.url(&format!("/boards/{board_id}/members")))
                .json(&body),
        )
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError> {
        self.send(self.client.get(self.url("/users"))).await
    }

    // -- lists --------------------------------------------------------------

    pub async fn create_list(&self, board_id: DbId, title: &str) -> Result<List, ClientError> {
        let body = serde_json::json!({ "title": title, "board_id": board_id });
        self.send(self.client.post(self.url("/lists")).json(&body))
            .await
    }

    pub async fn rename_list(&self, list_id: DbId, title: &str) -> Result<List, ClientError> {
        let body = serde_json::json!({ "title": title });
        self.send(
            self.client
                .put(self.url(&format!("/lists/{list_id}")))
                .json(&body),
        )
        .await
    }

    pub async fn delete_list(&self, list_id: DbId) -> Result<bool, ClientError> {
        let deleted: Deleted = self
            .send(self.client.delete(self.url(&format!("/lists/{list_id}"))))
            .await?;
        Ok(deleted.deleted)
    }

    // -- tasks --------------------------------------------------------------

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        self.send(self.client.post(self.url("/tasks")).json(task))
            .await
    }

    pub async fn update_task(&self, task_id: DbId, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("/tasks/{task_id}")))
                .json(patch),
        )
        .await
    }

    /// Persist the outcome of a task drag.
    pub async fn move_task(
        &self,
        task_id: DbId,
        placement: TaskPlacement,
    ) -> Result<Task, ClientError> {
        self.update_task(task_id, &TaskPatch::from(placement)).await
    }

    /// Assign `user_id` to `task` if unassigned, otherwise unassign them.
    pub async fn toggle_assignee(&self, task: &Task, user_id: DbId) -> Result<Task, ClientError> {
        let patch = TaskPatch {
            assignees: Some(toggle_assignee(&task.assignee_ids(), user_id)),
            ..TaskPatch::default()
        };
        self.update_task(task.id, &patch).await
    }

    pub async fn delete_task(&self, task_id: DbId) -> Result<bool, ClientError> {
        let deleted: Deleted = self
            .send(self.client.delete(self.url(&format!("/tasks/{task_id}"))))
            .await?;
        Ok(deleted.deleted)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            tracing::debug!(status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}
