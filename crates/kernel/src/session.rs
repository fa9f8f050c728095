//! Session management.
//!
//! Sessions live in the process-local memory store and hold only the
//! authenticated user's ID.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;

/// Session key for storing the authenticated user ID.
pub const SESSION_USER_ID: &str = "user_id";

/// Default session expiry (24 hours).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Parse a SameSite policy name, defaulting to `Lax`.
pub fn parse_same_site(value: &str) -> SameSite {
    match value {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

/// Create the session layer.
pub fn create_session_layer(
    same_site: SameSite,
    secure: bool,
    expiry_hours: i64,
) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(same_site)
        .with_expiry(Expiry::OnInactivity(Duration::hours(expiry_hours)))
}

/// Create the session layer described by `config`.
pub fn session_layer_from_config(config: &Config) -> SessionManagerLayer<MemoryStore> {
    create_session_layer(
        parse_same_site(&config.cookie_same_site),
        config.cookie_secure,
        config.session_expiry_hours,
    )
}
