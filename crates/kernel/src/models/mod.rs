//! Database models.

pub mod page;
pub mod role;
pub mod user;
pub mod website;

pub use page::{CreatePage, Page, UpdatePage};
pub use role::Role;
pub use user::{CreateUser, User};
pub use website::Website;
