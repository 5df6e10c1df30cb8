//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session only
//! carries the OAuth state nonce between the login redirect and the
//! callback, so the expiry is short.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "quitanda_session";

/// Session expiry time in seconds (10 minutes, long enough for a login).
const SESSION_EXPIRY_SECONDS: i64 = 10 * 60;

/// Create the session layer with `SQLite` store.
///
/// The store manages its own table; `migrate` creates it if missing.
///
/// # Errors
///
/// Returns an error if the session table cannot be created.
pub async fn create_session_layer(
    pool: &SqlitePool,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/"))
}
