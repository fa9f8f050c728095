//! Shared route helpers for session identity and request validation.

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::session::SESSION_USER_ID;
use crate::state::AppState;

/// Load the user behind the session, if any.
///
/// A session pointing at a user that no longer exists counts as anonymous.
pub async fn current_user(state: &AppState, session: &Session) -> AppResult<Option<User>> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.ok().flatten();

    let Some(id) = user_id else {
        return Ok(None);
    };

    Ok(User::find_by_id(state.db(), id).await?)
}

/// Require an authenticated user.
pub async fn require_login(state: &AppState, session: &Session) -> AppResult<User> {
    current_user(state, session)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Require an authenticated **admin** user.
///
/// Returns 401 without a session and 403 for non-admins.
pub async fn require_admin(state: &AppState, session: &Session) -> AppResult<User> {
    let user = require_login(state, session).await?;

    if !user.role.is_admin() {
        tracing::warn!(user_id = user.id, "admin action refused");
        return Err(AppError::Forbidden);
    }

    Ok(user)
}

/// Unwrap a JSON body, reporting malformed input as 422.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::Unprocessable(rejection.body_text())),
    }
}

/// Unwrap a path parameter, reporting an unparseable value as 422.
pub fn path_param<T>(param: Result<Path<T>, PathRejection>) -> AppResult<T> {
    match param {
        Ok(Path(value)) => Ok(value),
        Err(rejection) => Err(AppError::Unprocessable(rejection.body_text())),
    }
}

/// Reject blank text fields.
pub fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Unprocessable(format!("{field} must not be empty")));
    }
    Ok(())
}
