//! Shared helpers for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;

use crate::config::{Config, GoogleConfig};
use crate::db::test_pool;
use crate::services::email::test_support::RecordingNotifier;
use crate::services::email::SaleNotifier;
use crate::state::AppState;

/// Configuration that never touches the environment.
pub(crate) fn test_config() -> Config {
    Config {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 8000,
        base_url: "http://localhost:8000".to_string(),
        secret_key: SecretString::from("0123456789abcdef0123456789abcdef"),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        google: GoogleConfig {
            client_id: "client-id.apps.googleusercontent.com".to_string(),
            client_secret: SecretString::from("GOCSPX-testvalue"),
        },
        email: None,
        sentry_dsn: None,
    }
}

/// In-memory state with a migrated schema and a recording notifier.
pub(crate) async fn test_state() -> (AppState, Arc<RecordingNotifier>) {
    let pool = test_pool().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::with_notifier(test_config(), pool, Arc::clone(&notifier) as Arc<dyn SaleNotifier>);
    (state, notifier)
}
