//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Connection string fallback, matching the server's default.
const DEFAULT_DATABASE_URL: &str = "sqlite:quitanda.db?mode=rwc";

/// Read `DATABASE_URL` from the environment, falling back to the default.
pub(crate) fn database_url() -> SecretString {
    std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .unwrap_or_else(|_| SecretString::from(DEFAULT_DATABASE_URL))
}
