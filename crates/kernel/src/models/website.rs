//! Website setting: the single site-wide name.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Singleton website record.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Website {
    pub name: String,
}

impl Website {
    /// Load the website record.
    ///
    /// The row is created by the initial migration, so `None` means the
    /// database was not provisioned.
    pub async fn get(pool: &SqlitePool) -> Result<Option<Self>> {
        let website = sqlx::query_as::<_, Website>("SELECT name FROM website LIMIT 1")
            .fetch_optional(pool)
            .await
            .context("failed to fetch website")?;

        Ok(website)
    }

    /// Rename the site in place.
    ///
    /// Returns `false` if the website row is missing.
    pub async fn set_name(pool: &SqlitePool, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE website SET name = ?")
            .bind(name)
            .execute(pool)
            .await
            .context("failed to update website name")?;

        Ok(result.rows_affected() > 0)
    }
}
