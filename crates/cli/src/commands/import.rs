//! Catalog import command.
//!
//! Loads a JSON array export (for example from `mongoexport --jsonArray`) into
//! a catalog collection. Export metadata keys (`_id`, `__v`) are dropped; the
//! store assigns fresh IDs.
//!
//! # Usage
//!
//! ```bash
//! gp-cli import Roses roses.json
//! ```

use std::path::Path;

use garden_planner_server::db::Database;
use garden_planner_server::models::OWNED_COLLECTIONS;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{CommandError, database_url};

/// Keys stripped from imported documents.
const EXPORT_METADATA_KEYS: &[&str] = &["_id", "__v"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("`{0}` is managed by the server and cannot be imported into")]
    OwnedCollection(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of documents")]
    NotAnArray,

    #[error("Document {0} is not a JSON object")]
    NotAnObject(usize),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<garden_planner_server::db::StoreError> for ImportError {
    fn from(e: garden_planner_server::db::StoreError) -> Self {
        Self::Command(CommandError::Store(e))
    }
}

/// Import every document in `file` into `collection`. Returns the number of
/// documents inserted.
pub async fn run(collection: &str, file: &Path) -> Result<usize, ImportError> {
    if OWNED_COLLECTIONS.contains(&collection) {
        return Err(ImportError::OwnedCollection(collection.to_owned()));
    }

    let raw = std::fs::read_to_string(file).map_err(|source| ImportError::Io {
        path: file.display().to_string(),
        source,
    })?;
    let documents = prepare_documents(serde_json::from_str(&raw)?)?;

    let db = Database::connect(&database_url()?).await?;
    let target = db.collection(collection);
    let total = documents.len();
    for (i, document) in documents.into_iter().enumerate() {
        target.insert(document).await?;
        if (i + 1) % 500 == 0 {
            tracing::info!(imported = i + 1, total, "Importing...");
        }
    }
    db.close().await;

    tracing::info!(collection, total, "Import complete");
    Ok(total)
}

/// Split an exported array into document bodies, dropping export metadata.
fn prepare_documents(export: Value) -> Result<Vec<Map<String, Value>>, ImportError> {
    let Value::Array(items) = export else {
        return Err(ImportError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(mut body) => {
                for key in EXPORT_METADATA_KEYS {
                    body.remove(*key);
                }
                Ok(body)
            }
            _ => Err(ImportError::NotAnObject(i)),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_strips_export_metadata() {
        let docs = prepare_documents(json!([
            {"_id": {"$oid": "65f0"}, "__v": 0, "commonName": "Rose"},
            {"commonName": "Tulip"},
        ]))
        .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(Value::Object(docs[0].clone()), json!({"commonName": "Rose"}));
        assert_eq!(Value::Object(docs[1].clone()), json!({"commonName": "Tulip"}));
    }

    #[test]
    fn test_prepare_rejects_non_objects() {
        let err = prepare_documents(json!([{"a": 1}, "b"])).unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject(1)));
    }

    #[test]
    fn test_prepare_rejects_non_array() {
        let err = prepare_documents(json!({"commonName": "Rose"})).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));
    }

    #[tokio::test]
    async fn test_owned_collections_are_refused() {
        let err = run("User", Path::new("does-not-matter.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::OwnedCollection(name) if name == "User"));
    }
}
