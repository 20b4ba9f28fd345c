//! CLI command implementations.

pub mod import;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by commands that talk to the document store.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] garden_planner_server::db::StoreError),
}

/// Read `DATABASE_URL`, loading `.env` first if present.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))
}
