//! Session routes (login, current user, logout).

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::error::{AppError, AppResult, ErrorBody};
use crate::models::User;
use crate::session::SESSION_USER_ID;
use crate::state::AppState;

use super::helpers::{json_body, require_login};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Typed login error for explicit status code mapping.
#[derive(Debug)]
enum LoginError {
    /// Wrong username or password (401).
    InvalidCredentials,
    /// Anything else goes through the regular error path.
    App(AppError),
}

impl From<AppError> for LoginError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    error: "Incorrect username or password".to_string(),
                }),
            )
                .into_response(),
            LoginError::App(err) => err.into_response(),
        }
    }
}

/// Look up and check credentials.
async fn authenticate(state: &AppState, request: &LoginRequest) -> Result<User, LoginError> {
    let user = User::find_by_username(state.db(), &request.username)
        .await
        .map_err(AppError::from)?;

    match user {
        Some(user) if user.verify_password(&request.password) => Ok(user),
        _ => {
            info!(username = %request.username, "login failed");
            Err(LoginError::InvalidCredentials)
        }
    }
}

/// POST /api/sessions
///
/// Returns the authenticated user on success.
async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<User>, LoginError> {
    let request = json_body(payload)?;
    let user = authenticate(&state, &request).await?;

    // Fresh ID on privilege change.
    session.cycle_id().await.map_err(|e| {
        tracing::error!(error = %e, "failed to cycle session id");
        AppError::Internal(anyhow::anyhow!("session error"))
    })?;

    session
        .insert(SESSION_USER_ID, user.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to insert user_id into session");
            AppError::Internal(anyhow::anyhow!("session error"))
        })?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(user))
}

/// GET /api/sessions/current
async fn current(State(state): State<AppState>, session: Session) -> AppResult<Json<User>> {
    require_login(&state, &session).await.map(Json)
}

/// DELETE /api/sessions/current
///
/// Always succeeds, with or without a session.
async fn logout(session: Session) -> AppResult<Json<serde_json::Value>> {
    let user_id: Option<i64> = session.get(SESSION_USER_ID).await.ok().flatten();

    session.delete().await.map_err(|e| {
        tracing::error!(error = %e, "failed to delete session");
        AppError::Internal(anyhow::anyhow!("session error"))
    })?;

    if let Some(user_id) = user_id {
        info!(user_id, "user logged out");
    }

    Ok(Json(serde_json::json!({})))
}

/// Create the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(login))
        .route("/api/sessions/current", get(current).delete(logout))
}
