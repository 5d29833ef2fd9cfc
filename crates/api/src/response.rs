//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: list }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl DataResponse<Deleted> {
    pub fn deleted() -> Self {
        DataResponse {
            data: Deleted { deleted: true },
        }
    }
}
