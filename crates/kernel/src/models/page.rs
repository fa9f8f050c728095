//! Page model and CRUD operations.
//!
//! Content is stored in a single TEXT column using the tagged-line format
//! from [`crate::content::codec`]; rows are decoded as they are loaded.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::content::{ContentBlock, codec};

/// Page row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PageRow {
    id: i64,
    title: String,
    author: String,
    creation_date: NaiveDate,
    publication_date: Option<NaiveDate>,
    content: Option<String>,
}

/// Page with decoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub title: String,
    /// Author's display name.
    pub author: String,
    pub creation_date: NaiveDate,
    /// `None` for drafts.
    pub publication_date: Option<NaiveDate>,
    pub content: Vec<ContentBlock>,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            creation_date: row.creation_date,
            publication_date: row.publication_date,
            content: codec::decode(row.content.as_deref()),
        }
    }
}

/// Input for creating a new page.
#[derive(Debug, Clone)]
pub struct CreatePage {
    pub title: String,
    pub author: String,
    pub content: Vec<ContentBlock>,
    pub publication_date: Option<NaiveDate>,
}

/// Input for editing a page. Every editable field is replaced.
#[derive(Debug, Clone)]
pub struct UpdatePage {
    pub title: String,
    pub author: String,
    pub content: Vec<ContentBlock>,
    pub publication_date: Option<NaiveDate>,
}

impl Page {
    /// Find a page by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, PageRow>(
            "SELECT id, title, author, creation_date, publication_date, content FROM pages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch page by id")?;

        Ok(row.map(Page::from))
    }

    /// List every page in storage order.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT id, title, author, creation_date, publication_date, content FROM pages ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("failed to list pages")?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    /// Create a new page created on `creation_date`.
    pub async fn create(
        pool: &SqlitePool,
        input: CreatePage,
        creation_date: NaiveDate,
    ) -> Result<Self> {
        let content = codec::encode(&input.content);

        let result = sqlx::query(
            r#"
            INSERT INTO pages (title, author, creation_date, publication_date, content)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(creation_date)
        .bind(input.publication_date)
        .bind(&content)
        .execute(pool)
        .await
        .context("failed to insert page")?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created page"))
    }

    /// Replace the editable fields of a page.
    ///
    /// Returns `None` if no page has this ID. The creation date is never touched.
    pub async fn update(pool: &SqlitePool, id: i64, input: UpdatePage) -> Result<Option<Self>> {
        let content = codec::encode(&input.content);

        let result = sqlx::query(
            r#"
            UPDATE pages SET
                title = ?,
                author = ?,
                content = ?,
                publication_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&content)
        .bind(input.publication_date)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update page")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Delete a page.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete page")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn pool() -> SqlitePool {
        let pool = crate::db::connect("sqlite::memory:", 1).await.unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn input(title: &str) -> CreatePage {
        CreatePage {
            title: title.to_string(),
            author: "alice".to_string(),
            content: vec![
                ContentBlock::header("Hello"),
                ContentBlock::paragraph("line one\nline two"),
                ContentBlock::image("cat"),
            ],
            publication_date: Some(date("2024-02-01")),
        }
    }

    #[tokio::test]
    async fn create_then_find_decodes_content() {
        let pool = pool().await;

        let page = Page::create(&pool, input("First"), date("2024-01-15"))
            .await
            .unwrap();
        let found = Page::find_by_id(&pool, page.id).await.unwrap().unwrap();

        assert_eq!(found, page);
        assert_eq!(found.creation_date, date("2024-01-15"));
        assert_eq!(found.publication_date, Some(date("2024-02-01")));
        assert_eq!(found.content[1], ContentBlock::paragraph("line one line two"));
    }

    #[tokio::test]
    async fn content_is_stored_as_tagged_lines() {
        let pool = pool().await;
        let page = Page::create(&pool, input("Stored"), date("2024-01-15"))
            .await
            .unwrap();

        let raw: String = sqlx::query_scalar("SELECT content FROM pages WHERE id = ?")
            .bind(page.id)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(raw, "!HHello\n!Pline one line two\n!Icat");
    }

    #[tokio::test]
    async fn legacy_rows_drop_untagged_lines() {
        let pool = pool().await;
        sqlx::query(
            "INSERT INTO pages (title, author, creation_date, content) VALUES ('Old', 'alice', '2020-01-01', ?)",
        )
        .bind("!HTitle\ngarbage\n!PBody")
        .execute(&pool)
        .await
        .unwrap();

        let pages = Page::list_all(&pool).await.unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0].content,
            vec![ContentBlock::header("Title"), ContentBlock::paragraph("Body")]
        );
        assert_eq!(pages[0].publication_date, None);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_not_creation_date() {
        let pool = pool().await;
        let page = Page::create(&pool, input("Before"), date("2024-01-15"))
            .await
            .unwrap();

        let updated = Page::update(
            &pool,
            page.id,
            UpdatePage {
                title: "After".to_string(),
                author: "bob".to_string(),
                content: vec![ContentBlock::paragraph("new")],
                publication_date: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.author, "bob");
        assert_eq!(updated.content, vec![ContentBlock::paragraph("new")]);
        assert_eq!(updated.publication_date, None);
        assert_eq!(updated.creation_date, date("2024-01-15"));
    }

    #[tokio::test]
    async fn update_and_delete_missing_page() {
        let pool = pool().await;
        let missing = UpdatePage {
            title: "x".to_string(),
            author: "x".to_string(),
            content: vec![],
            publication_date: None,
        };

        assert!(Page::update(&pool, 999, missing).await.unwrap().is_none());
        assert!(!Page::delete(&pool, 999).await.unwrap());
        assert!(Page::find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_is_in_insertion_order() {
        let pool = pool().await;
        for title in ["a", "b", "c"] {
            Page::create(&pool, input(title), date("2024-01-15"))
                .await
                .unwrap();
        }

        let titles: Vec<String> = Page::list_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = pool().await;
        let page = Page::create(&pool, input("Doomed"), date("2024-01-15"))
            .await
            .unwrap();

        assert!(Page::delete(&pool, page.id).await.unwrap());
        assert!(Page::find_by_id(&pool, page.id).await.unwrap().is_none());
    }
}
