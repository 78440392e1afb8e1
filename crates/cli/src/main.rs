//! FreshMarket CLI - Database migrations and sample data.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema and session table)
//! fm-cli migrate
//!
//! # Insert the sample catalog into an empty database
//! fm-cli seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "FreshMarket CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert the sample catalog if no categories exist
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::sample_catalog().await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}
