//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! gp-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/server/migrations/`, embedded at build time.

use garden_planner_server::db::PgDocumentStore;

use super::{CommandError, database_url};

/// Apply pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let store = PgDocumentStore::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    store.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
