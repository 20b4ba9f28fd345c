//! Garden Planner CLI - Database migrations and catalog import.
//!
//! # Usage
//!
//! ```bash
//! # Apply document store migrations
//! gp-cli migrate
//!
//! # Load a plant catalog collection from a JSON array export
//! gp-cli import Roses roses.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `import` - Load catalog documents into a collection

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gp-cli")]
#[command(author, version, about = "Garden Planner CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Import a JSON array of documents into a catalog collection
    Import {
        /// Target collection name (e.g. `Roses`)
        collection: String,

        /// Path to a JSON file containing an array of objects
        file: PathBuf,
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
        Commands::Import { collection, file } => {
            commands::import::run(&collection, &file).await?;
        }
    }
    Ok(())
}
