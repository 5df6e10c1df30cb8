//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{GoogleClient, TokenManager};
use crate::config::Config;
use crate::services::email::{EmailNotifier, NullNotifier, SaleNotifier};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pool: SqlitePool,
    tokens: TokenManager,
    google: GoogleClient,
    notifier: Arc<dyn SaleNotifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the Google OAuth client and token manager from configuration.
    /// When no SMTP host is configured, sale notifications are dropped
    /// instead of sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(
        config: Config,
        pool: SqlitePool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let tokens = TokenManager::new(&config.secret_key);
        let google = GoogleClient::new(&config.google, config.oauth_redirect_uri());
        let notifier: Arc<dyn SaleNotifier> = match &config.email {
            Some(email) => Arc::new(EmailNotifier::new(email)?),
            None => Arc::new(NullNotifier),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                google,
                notifier,
            }),
        })
    }

    /// State with an injected notifier, for exercising the sale workflow.
    #[cfg(test)]
    pub(crate) fn with_notifier(
        config: Config,
        pool: SqlitePool,
        notifier: Arc<dyn SaleNotifier>,
    ) -> Self {
        let tokens = TokenManager::new(&config.secret_key);
        let google = GoogleClient::new(&config.google, config.oauth_redirect_uri());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                google,
                notifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the access-token manager.
    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.inner.tokens
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleClient {
        &self.inner.google
    }

    /// Get a reference to the sale notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn SaleNotifier {
        self.inner.notifier.as_ref()
    }
}
