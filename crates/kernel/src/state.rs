//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::content::PageService;
use crate::db;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// SQLite connection pool.
    db: SqlitePool,

    /// Page listing and authoring.
    pages: PageService,
}

impl AppState {
    /// Create application state: connect to the database and migrate it.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        Ok(Self::from_pool(db))
    }

    /// Build state around an already migrated pool.
    pub fn from_pool(db: SqlitePool) -> Self {
        let pages = PageService::new(db.clone());

        Self {
            inner: Arc::new(AppStateInner { db, pages }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the page service.
    pub fn pages(&self) -> &PageService {
        &self.inner.pages
    }

    /// Check database connectivity.
    pub async fn database_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
