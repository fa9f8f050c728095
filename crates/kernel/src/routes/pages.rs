//! Page API route handlers.
//!
//! Listing views, single-page retrieval, and authoring. Authorization and
//! input validation happen here, before the page service is called.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::content::views;
use crate::content::{ContentBlock, PageStatus, PageView};
use crate::error::{AppError, AppResult};
use crate::models::{CreatePage, Page, UpdatePage, User};
use crate::state::AppState;

use super::helpers::{current_user, json_body, path_param, require_login, require_text};

/// Request body for creating or editing a page.
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub title: String,
    pub author: String,
    pub content: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub publication_date: Option<NaiveDate>,
}

impl PageRequest {
    /// Check the request against a page created on `creation_date`.
    fn validate(&self, creation_date: NaiveDate) -> AppResult<()> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)?;

        if self.content.is_empty() {
            return Err(AppError::Unprocessable(
                "content must contain at least one block".to_string(),
            ));
        }

        for (i, block) in self.content.iter().enumerate() {
            require_text(&format!("content[{i}].body"), &block.body)?;
        }

        if self.publication_date.is_some_and(|d| d < creation_date) {
            return Err(AppError::Unprocessable(format!(
                "publication date cannot be prior to creation date ({creation_date})"
            )));
        }

        Ok(())
    }
}

/// Response for a successful deletion.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Accept `null`, `""`, a calendar date, or an RFC 3339 timestamp.
///
/// Timestamps are reduced to their local calendar date.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    parse_date(value.trim()).map(Some).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid publication date: {value}"))
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pages", get(list_all).post(create_page))
        .route("/api/pages/published", get(list_published))
        .route("/api/pages/drafts", get(list_drafts))
        .route("/api/pages/scheduled", get(list_scheduled))
        .route(
            "/api/pages/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
}

async fn list_view(state: &AppState, session: &Session, view: PageView) -> AppResult<Vec<Page>> {
    if !view.is_public() {
        require_login(state, session).await?;
    }

    Ok(state.pages().list(view).await?)
}

/// GET /api/pages
async fn list_all(State(state): State<AppState>, session: Session) -> AppResult<Json<Vec<Page>>> {
    list_view(&state, &session, PageView::All).await.map(Json)
}

/// GET /api/pages/published
async fn list_published(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Page>>> {
    list_view(&state, &session, PageView::Published)
        .await
        .map(Json)
}

/// GET /api/pages/drafts
async fn list_drafts(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Page>>> {
    list_view(&state, &session, PageView::Drafts).await.map(Json)
}

/// GET /api/pages/scheduled
async fn list_scheduled(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Page>>> {
    list_view(&state, &session, PageView::Scheduled)
        .await
        .map(Json)
}

fn page_not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

/// GET /api/pages/{id}
///
/// Anonymous visitors only see published pages; anything else is reported
/// as missing.
async fn get_page(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Page>> {
    let id = path_param(id)?;
    let page = state.pages().load(id).await?.ok_or_else(page_not_found)?;

    let status = PageStatus::classify(page.publication_date, views::today());
    if status != PageStatus::Published && current_user(&state, &session).await?.is_none() {
        return Err(page_not_found());
    }

    Ok(Json(page))
}

/// POST /api/pages
async fn create_page(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<PageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Page>)> {
    let user = require_login(&state, &session).await?;
    let request = json_body(payload)?;
    let today = views::today();
    request.validate(today)?;

    let acting = user.acting();
    if acting.is_admin() && acting.name != request.author {
        ensure_author_exists(&state, &request.author).await?;
    }

    let page = state
        .pages()
        .create_on(
            CreatePage {
                title: request.title,
                author: request.author,
                content: request.content,
                publication_date: request.publication_date,
            },
            &acting,
            today,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(page)))
}

/// PUT /api/pages/{id}
async fn update_page(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PageRequest>, JsonRejection>,
) -> AppResult<Json<Page>> {
    let user = require_login(&state, &session).await?;
    let id = path_param(id)?;
    let request = json_body(payload)?;
    let acting = user.acting();

    let existing = state.pages().load(id).await?.ok_or_else(page_not_found)?;
    request.validate(existing.creation_date)?;

    if !acting.can_manage(&existing.author) || !acting.can_manage(&request.author) {
        warn!(
            page_id = id,
            user = %acting.name,
            author = %request.author,
            "page edit refused"
        );
        return Err(AppError::Forbidden);
    }

    ensure_author_exists(&state, &request.author).await?;

    let page = state
        .pages()
        .update(
            id,
            UpdatePage {
                title: request.title,
                author: request.author,
                content: request.content,
                publication_date: request.publication_date,
            },
        )
        .await?
        .ok_or_else(page_not_found)?;

    Ok(Json(page))
}

/// DELETE /api/pages/{id}
async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let user = require_login(&state, &session).await?;
    let id = path_param(id)?;
    let acting = user.acting();

    let existing = state.pages().load(id).await?.ok_or_else(page_not_found)?;

    if !acting.can_manage(&existing.author) {
        warn!(page_id = id, user = %acting.name, "page delete refused");
        return Err(AppError::Forbidden);
    }

    if !state.pages().delete(id).await? {
        return Err(page_not_found());
    }

    Ok(Json(MessageResponse {
        message: "Page deleted".to_string(),
    }))
}

async fn ensure_author_exists(state: &AppState, author: &str) -> AppResult<()> {
    if User::find_by_name(state.db(), author).await?.is_none() {
        return Err(AppError::NotFound("Author not found".to_string()));
    }
    Ok(())
}
