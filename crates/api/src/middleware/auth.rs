//! Bearer-token authentication.
//!
//! REST handlers take [`AuthUser`]; the socket upgrade passes its `?token=`
//! through [`authenticate`]. Both reject with `401 UNAUTHORIZED`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// The caller of a REST handler, taken from `Authorization: Bearer <jwt>`.
///
/// Every board, list and task route requires one:
///
/// ```ignore
/// async fn rename(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<()>> {
///     board_for_member(&state.pool, board_id, auth.user_id).await?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The token subject.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = authenticate(token, &state.config.jwt)?;
        Ok(AuthUser { user_id })
    }
}

/// Verify a raw token and return the user id it was issued for.
pub fn authenticate(token: &str, jwt: &JwtConfig) -> Result<DbId, AppError> {
    validate_token(token, jwt)
        .map(|claims| claims.sub)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })
}

/// The token part of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid ASCII"))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>",
        )),
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
