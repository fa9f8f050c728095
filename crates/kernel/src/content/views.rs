//! Page listing views.
//!
//! Every listing (back-office tabs and the public front page) is one of four
//! views over the full page set. Classification is by calendar date only:
//! a page published "today" is already live.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate};

use crate::models::Page;

/// Publication state of a single page relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Draft,
    Published,
    Scheduled,
}

impl PageStatus {
    /// Classify a publication date against `today`.
    pub fn classify(publication_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match publication_date {
            None => PageStatus::Draft,
            Some(date) if date > today => PageStatus::Scheduled,
            Some(_) => PageStatus::Published,
        }
    }
}

/// A listing over the page set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    /// Every page, in storage order.
    All,
    /// Pages without a publication date, in storage order.
    Drafts,
    /// Pages published on or before today, most recent first.
    Published,
    /// Pages with a future publication date, farthest first.
    Scheduled,
}

impl PageView {
    /// Whether anonymous visitors may see this view.
    pub fn is_public(self) -> bool {
        matches!(self, PageView::Published)
    }

    /// Select and order the pages belonging to this view.
    ///
    /// `pages` must be in storage order. Ties on publication date keep
    /// their storage order.
    pub fn select(self, pages: Vec<Page>, today: NaiveDate) -> Vec<Page> {
        match self {
            PageView::All => pages,
            PageView::Drafts => retain_status(pages, PageStatus::Draft, today),
            PageView::Published | PageView::Scheduled => {
                let status = if self == PageView::Published {
                    PageStatus::Published
                } else {
                    PageStatus::Scheduled
                };
                let mut selected = retain_status(pages, status, today);
                // `sort_by` is stable.
                selected.sort_by(|a, b| newest_first(a.publication_date, b.publication_date));
                selected
            }
        }
    }
}

fn retain_status(pages: Vec<Page>, status: PageStatus, today: NaiveDate) -> Vec<Page> {
    pages
        .into_iter()
        .filter(|page| PageStatus::classify(page.publication_date, today) == status)
        .collect()
}

/// Later dates sort first; equal dates compare equal.
fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    b.cmp(&a)
}

/// The current local calendar date.
///
/// Listings call this once per query so every page is classified against
/// the same day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::ContentBlock;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn page(id: i64, publication_date: Option<NaiveDate>) -> Page {
        Page {
            id,
            title: format!("Page {id}"),
            author: "alice".to_string(),
            creation_date: date("2020-01-01"),
            publication_date,
            content: vec![ContentBlock::header("Title")],
        }
    }

    fn ids(pages: &[Page]) -> Vec<i64> {
        pages.iter().map(|p| p.id).collect()
    }

    fn sample(today: NaiveDate) -> Vec<Page> {
        vec![
            page(1, Some(date("2020-01-10"))),
            page(2, None),
            page(3, Some(today + chrono::Days::new(30))),
            page(4, Some(date("2021-06-01"))),
        ]
    }

    #[test]
    fn all_keeps_storage_order() {
        let today = date("2024-05-01");
        assert_eq!(ids(&PageView::All.select(sample(today), today)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn drafts_are_pages_without_publication_date() {
        let today = date("2024-05-01");
        assert_eq!(ids(&PageView::Drafts.select(sample(today), today)), vec![2]);
    }

    #[test]
    fn published_sorted_most_recent_first() {
        let today = date("2024-05-01");
        assert_eq!(ids(&PageView::Published.select(sample(today), today)), vec![4, 1]);
    }

    #[test]
    fn scheduled_are_future_pages() {
        let today = date("2024-05-01");
        assert_eq!(ids(&PageView::Scheduled.select(sample(today), today)), vec![3]);
    }

    #[test]
    fn scheduled_sorted_farthest_first() {
        let today = date("2024-05-01");
        let pages = vec![
            page(1, Some(date("2024-06-01"))),
            page(2, Some(date("2025-01-01"))),
            page(3, Some(date("2024-05-02"))),
        ];
        assert_eq!(ids(&PageView::Scheduled.select(pages, today)), vec![2, 1, 3]);
    }

    #[test]
    fn publication_today_is_published() {
        let today = date("2024-05-01");
        let pages = vec![page(1, Some(today))];

        assert_eq!(ids(&PageView::Published.select(pages.clone(), today)), vec![1]);
        assert!(PageView::Scheduled.select(pages, today).is_empty());
        assert_eq!(PageStatus::classify(Some(today), today), PageStatus::Published);
    }

    #[test]
    fn tomorrow_is_scheduled() {
        let today = date("2024-05-01");
        assert_eq!(
            PageStatus::classify(Some(date("2024-05-02")), today),
            PageStatus::Scheduled
        );
        assert_eq!(PageStatus::classify(None, today), PageStatus::Draft);
    }

    #[test]
    fn equal_dates_keep_storage_order() {
        let today = date("2024-05-01");
        let pages = vec![
            page(1, Some(date("2023-03-03"))),
            page(2, Some(date("2024-01-01"))),
            page(3, Some(date("2023-03-03"))),
            page(4, Some(date("2023-03-03"))),
        ];
        assert_eq!(
            ids(&PageView::Published.select(pages, today)),
            vec![2, 1, 3, 4]
        );

        let future = vec![
            page(5, Some(date("2030-01-01"))),
            page(6, Some(date("2030-01-01"))),
        ];
        assert_eq!(ids(&PageView::Scheduled.select(future, today)), vec![5, 6]);
    }

    #[test]
    fn only_published_is_public() {
        assert!(PageView::Published.is_public());
        assert!(!PageView::All.is_public());
        assert!(!PageView::Drafts.is_public());
        assert!(!PageView::Scheduled.is_public());
    }
}
