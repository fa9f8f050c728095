//! Page service.
//!
//! Listing and authoring operations over [`Page`] rows. Authorization is
//! the caller's job, with one exception owned here: a non-Admin creating a
//! page always becomes its author.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use super::views::{self, PageView};
use crate::auth::ActingUser;
use crate::models::{CreatePage, Page, UpdatePage};

/// Service for page listing and CRUD.
#[derive(Clone)]
pub struct PageService {
    inner: Arc<PageServiceInner>,
}

struct PageServiceInner {
    pool: SqlitePool,
}

impl PageService {
    /// Create a new page service.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(PageServiceInner { pool }),
        }
    }

    /// List the pages of a view, classified against the current day.
    pub async fn list(&self, view: PageView) -> Result<Vec<Page>> {
        self.list_on(view, views::today()).await
    }

    /// List the pages of a view, classified against `today`.
    pub async fn list_on(&self, view: PageView, today: NaiveDate) -> Result<Vec<Page>> {
        let pages = Page::list_all(&self.inner.pool).await?;
        Ok(view.select(pages, today))
    }

    /// Load a page by ID.
    pub async fn load(&self, id: i64) -> Result<Option<Page>> {
        Page::find_by_id(&self.inner.pool, id).await
    }

    /// Create a page dated today on behalf of `acting`.
    pub async fn create(&self, input: CreatePage, acting: &ActingUser) -> Result<Page> {
        self.create_on(input, acting, views::today()).await
    }

    /// Create a page with `creation_date` set to `today`.
    pub async fn create_on(
        &self,
        mut input: CreatePage,
        acting: &ActingUser,
        today: NaiveDate,
    ) -> Result<Page> {
        let resolved = acting.resolve_author(&input.author);
        if resolved != input.author {
            info!(
                requested = %input.author,
                author = %resolved,
                "page author replaced by acting user"
            );
            input.author = resolved;
        }

        let page = Page::create(&self.inner.pool, input, today).await?;

        info!(page_id = page.id, author = %page.author, "page created");
        Ok(page)
    }

    /// Replace the editable fields of a page.
    pub async fn update(&self, id: i64, input: UpdatePage) -> Result<Option<Page>> {
        let page = Page::update(&self.inner.pool, id, input).await?;

        if let Some(ref p) = page {
            info!(page_id = p.id, author = %p.author, "page updated");
        }

        Ok(page)
    }

    /// Delete a page. Returns `false` if it did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = Page::delete(&self.inner.pool, id).await?;

        if deleted {
            info!(page_id = id, "page deleted");
        }

        Ok(deleted)
    }
}
