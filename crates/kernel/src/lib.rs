//! Pagedesk kernel library.
//!
//! Exposes the page store, HTTP routes, and CLI for the `pagedesk` binary
//! and for integration testing.

pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use state::AppState;
