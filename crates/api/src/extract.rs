//! Request extractors whose rejections use the API's JSON error body.
//!
//! Axum's own `Json` and `Path` reject with plain-text bodies (and 422 for
//! a body that parses but misses a field). These wrappers route the
//! rejection through [`AppError`] so every failure carries `{"error", "code"}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use taskboard_core::error::CoreError;

use crate::error::AppError;

/// JSON request body. A well-formed body with missing or mistyped fields is
/// a `VALIDATION_ERROR`; anything that is not JSON at all is a `BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters. An id that does not parse is a `BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Core(CoreError::Validation(err.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
