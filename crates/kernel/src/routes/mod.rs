//! HTTP route handlers.

pub mod auth;
pub mod health;
mod helpers;
pub mod pages;
pub mod website;

use axum::Router;

use crate::state::AppState;

/// Assemble every route group into one router.
///
/// Session and CORS layers are applied by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(pages::router())
        .merge(website::router())
        .merge(health::router())
}
