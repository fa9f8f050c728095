//! Page content.
//!
//! This module provides:
//! - codec: block list to and from the persisted tagged-line string
//! - views: All / Drafts / Published / Scheduled listing rules
//! - PageService: listing and authoring operations

pub mod codec;
mod page_service;
pub mod views;

pub use codec::{BlockKind, ContentBlock};
pub use page_service::PageService;
pub use views::{PageStatus, PageView};
