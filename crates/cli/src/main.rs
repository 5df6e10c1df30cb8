//! Quitanda CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! quitanda migrate
//!
//! # Seed the database with a demo user, store, and inventory
//! quitanda seed
//!
//! # Seed under a specific owner
//! quitanda seed -e owner@example.com -n "Demo Owner"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quitanda")]
#[command(author, version, about = "Quitanda CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a demo user, store, and inventory
    Seed {
        /// Email address of the demo user who owns the seeded store
        #[arg(short, long, default_value = "owner@example.com")]
        email: String,

        /// Display name of the demo user
        #[arg(short, long, default_value = "Demo Owner")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { email, name } => commands::seed::run(&email, &name).await?,
    }
    Ok(())
}
