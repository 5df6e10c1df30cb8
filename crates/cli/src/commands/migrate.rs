//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! quitanda migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `SQLite` connection string (default: sqlite:quitanda.db?mode=rwc)
//!
//! The server also runs migrations on startup; this command exists so the
//! schema can be brought up to date without starting it, e.g. before a seed.

use quitanda_server::db;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
