//! Website name routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::Website;
use crate::state::AppState;

use super::helpers::{json_body, require_admin, require_text};

/// Rename request body.
#[derive(Debug, Deserialize)]
pub struct WebsiteRequest {
    pub name: String,
}

fn not_provisioned() -> AppError {
    AppError::NotFound("Website not found".to_string())
}

/// GET /api/website
async fn get_website(State(state): State<AppState>) -> AppResult<Json<Website>> {
    let website = Website::get(state.db()).await?.ok_or_else(not_provisioned)?;
    Ok(Json(website))
}

/// PUT /api/website (Admin only)
async fn update_website(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<WebsiteRequest>, JsonRejection>,
) -> AppResult<Json<Website>> {
    let user = require_admin(&state, &session).await?;
    let request = json_body(payload)?;
    require_text("name", &request.name)?;

    if !Website::set_name(state.db(), &request.name).await? {
        return Err(not_provisioned());
    }

    info!(user_id = user.id, name = %request.name, "website renamed");
    Ok(Json(Website { name: request.name }))
}

/// Create the website router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/website", get(get_website).put(update_website))
}
