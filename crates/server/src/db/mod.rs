//! Database layer for the quitanda server.
//!
//! Tables (created by migrations in `crates/server/migrations/`):
//! - `users`: store owners, provisioned on first Google login
//! - `stores`: one row per store, scoped to its owning user
//! - `inventory_items`: per-store stock ledger, one row per (store, fruit)
//! - `sales`: recorded sales, append-heavy
//! - `suppliers`: per-store supplier directory
//!
//! Migrations are embedded in the binary and applied at startup. They can
//! also be run manually with `cargo run -p quitanda-cli -- migrate`.
//!
//! All identifiers are UUIDs stored as TEXT, timestamps ISO 8601 TEXT in
//! UTC. Rows are decoded into domain types via `TryFrom`, and an
//! unparseable id surfaces as [`RepositoryError::DataCorruption`] rather
//! than a panic.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;

pub mod inventory;
pub mod sales;
pub mod stores;
pub mod suppliers;
pub mod users;

pub use inventory::InventoryRepository;
pub use sales::SaleRepository;
pub use stores::StoreRepository;
pub use suppliers::SupplierRepository;
pub use users::UserRepository;

/// Embedded migrations, applied at startup and by the cli.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Parse a TEXT id column into a `Uuid`.
///
/// Stored ids are written by this application, so a parse failure means
/// the database was edited out-of-band.
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<uuid::Uuid, RepositoryError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid uuid in {column}: {e}")))
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Entity not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate tax id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a connection pool from a database URL.
///
/// WAL journaling keeps readers from blocking the write path, and foreign
/// keys are switched on explicitly since `SQLite` ships with them off.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the database cannot be
/// opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// migration history is inconsistent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// In-memory pool with migrations applied.
///
/// Single connection only: each `sqlite::memory:` connection is its own
/// database, so a second connection would see empty tables.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    MIGRATOR.run(&pool).await.expect("migrations apply");
    pool
}
