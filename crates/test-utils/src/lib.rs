//! Pagedesk test utilities.
//!
//! Fixture builders for page request payloads and date helpers for
//! classification tests.

use chrono::{Days, Local, NaiveDate};
use serde_json::Value as JsonValue;

/// Start building a page payload.
pub fn test_page(title: &str, author: &str) -> TestPage {
    TestPage {
        title: title.to_string(),
        author: author.to_string(),
        blocks: Vec::new(),
        publication_date: None,
    }
}

/// A page payload builder for POST/PUT requests.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub title: String,
    pub author: String,
    pub blocks: Vec<(String, String)>,
    pub publication_date: Option<NaiveDate>,
}

impl TestPage {
    fn block(mut self, kind: &str, body: &str) -> Self {
        self.blocks.push((kind.to_string(), body.to_string()));
        self
    }

    /// Append a header block.
    pub fn header(self, body: &str) -> Self {
        self.block("Header", body)
    }

    /// Append a paragraph block.
    pub fn paragraph(self, body: &str) -> Self {
        self.block("Paragraph", body)
    }

    /// Append an image block.
    pub fn image(self, body: &str) -> Self {
        self.block("Image", body)
    }

    /// Set the publication date.
    pub fn published_on(mut self, date: NaiveDate) -> Self {
        self.publication_date = Some(date);
        self
    }

    /// Clear the publication date, making the page a draft.
    pub fn draft(mut self) -> Self {
        self.publication_date = None;
        self
    }

    /// Render the request body.
    ///
    /// A page with no blocks gets a single header repeating the title.
    pub fn to_json(&self) -> JsonValue {
        let content: Vec<JsonValue> = if self.blocks.is_empty() {
            vec![serde_json::json!({ "type": "Header", "body": self.title })]
        } else {
            self.blocks
                .iter()
                .map(|(kind, body)| serde_json::json!({ "type": kind, "body": body }))
                .collect()
        };

        serde_json::json!({
            "title": self.title,
            "author": self.author,
            "content": content,
            "publication_date": self.publication_date.map(|d| d.to_string()),
        })
    }
}

/// The local date `offset` days from today (negative for the past).
pub fn days_from_today(offset: i64) -> NaiveDate {
    let today = Local::now().date_naive();
    let days = Days::new(offset.unsigned_abs());

    let shifted = if offset >= 0 {
        today.checked_add_days(days)
    } else {
        today.checked_sub_days(days)
    };

    shifted.unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_is_a_header() {
        let json = test_page("About", "Ann").to_json();
        assert_eq!(json["content"][0]["type"], "Header");
        assert_eq!(json["content"][0]["body"], "About");
        assert!(json["publication_date"].is_null());
    }

    #[test]
    fn blocks_keep_their_order() {
        let json = test_page("About", "Ann")
            .header("Hello")
            .image("cat.png")
            .paragraph("text")
            .published_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default())
            .to_json();

        let kinds: Vec<&str> = json["content"]
            .as_array()
            .map(|blocks| blocks.iter().filter_map(|b| b["type"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(kinds, ["Header", "Image", "Paragraph"]);
        assert_eq!(json["publication_date"], "2024-03-01");
    }

    #[test]
    fn day_offsets() {
        let today = days_from_today(0);
        assert!(days_from_today(-1) < today);
        assert!(days_from_today(1) > today);
    }
}
