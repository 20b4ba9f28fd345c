//! Document store access.
//!
//! # Storage
//!
//! Every collection lives in a single `PostgreSQL` table of JSONB documents:
//!
//! ```text
//! documents(seq BIGSERIAL, id UUID PRIMARY KEY, collection TEXT, body JSONB, created_at TIMESTAMPTZ)
//! ```
//!
//! - `User`, `Layout`, `Comments` - owned by this server (see [`crate::models`])
//! - anything else - plant catalog collections loaded with `gp-cli import`
//!
//! Filters are equality matches on top-level fields. Results come back in
//! insertion order.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p garden-planner-cli -- migrate
//! ```

pub mod collection;
pub mod comments;
pub mod layouts;
pub mod memory;
pub mod postgres;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, Layout, User, ValidationError};

pub use collection::{Collection, RawCollection, Stored};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Document rejected by the validation stage.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A unique index rejected the write.
    #[error("duplicate value for unique field `{field}` in `{collection}`")]
    Conflict {
        collection: String,
        field: &'static str,
    },

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Stored data could not be decoded into the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A unique constraint on one top-level field of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueIndex {
    /// Index name as created by the migrations.
    pub name: &'static str,
    pub collection: &'static str,
    pub field: &'static str,
}

/// Unique indexes enforced by every backend.
pub const UNIQUE_INDEXES: &[UniqueIndex] = &[
    UniqueIndex {
        name: "documents_user_email_key",
        collection: "User",
        field: "email",
    },
    UniqueIndex {
        name: "documents_user_username_key",
        collection: "User",
        field: "username",
    },
];

/// A stored document: its ID plus the JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Map<String, Value>,
}

impl Document {
    /// Render the document for clients, with the ID under `_id`.
    #[must_use]
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert("_id".to_owned(), Value::String(self.id.to_string()));
        Value::Object(body)
    }
}

/// Equality filter over top-level document fields. An empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Filter matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_owned(), value.into());
        self
    }

    /// Require `field` to equal `value` when a value is given.
    #[must_use]
    pub fn eq_opt(self, field: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    /// Whether `body` satisfies every condition.
    #[must_use]
    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }

    /// The filter as a JSON object (used for JSONB containment).
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Backend for named collections of JSON documents.
///
/// Implementations must be safe for concurrent use; no extra locking is done
/// by callers.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert a document and return it with its new ID.
    ///
    /// Fails with `StoreError::Conflict` if a unique index rejects it.
    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError>;

    /// All documents matching `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// First document matching `filter`.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Overwrite the top-level fields in `patch`, leaving others untouched.
    ///
    /// Returns `false` if no document has that ID.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release connections. Called once at shutdown.
    async fn close(&self);
}

/// Handle to the document store, shared by all handlers.
///
/// Cheap to clone. Opened once at startup with [`Database::connect`] and
/// closed with [`Database::close`] after the server stops.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    /// Connect to `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, StoreError> {
        Ok(Self::from_store(PgDocumentStore::connect(database_url).await?))
    }

    /// A process-local store, for tests and local development.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(MemoryDocumentStore::new())
    }

    /// Wrap an arbitrary backend.
    pub fn from_store(store: impl DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The `User` collection.
    #[must_use]
    pub fn users(&self) -> Collection<User> {
        Collection::new(Arc::clone(&self.store))
    }

    /// The `Layout` collection.
    #[must_use]
    pub fn layouts(&self) -> Collection<Layout> {
        Collection::new(Arc::clone(&self.store))
    }

    /// The `Comments` collection.
    #[must_use]
    pub fn comments(&self) -> Collection<Comment> {
        Collection::new(Arc::clone(&self.store))
    }

    /// Untyped access to any collection by name.
    #[must_use]
    pub fn collection(&self, name: &str) -> RawCollection {
        RawCollection::new(Arc::clone(&self.store), name)
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it is not.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Close the underlying connections.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::all().matches(&Map::new()));
        assert!(Filter::all().matches(&body(json!({"a": 1}))));
    }

    #[test]
    fn test_filter_requires_all_fields() {
        let filter = Filter::all()
            .eq("layoutOwner", "alice")
            .eq("layoutName", "Herbs");

        assert!(filter.matches(&body(json!({
            "layoutOwner": "alice",
            "layoutName": "Herbs",
            "commentText": "hi"
        }))));
        assert!(!filter.matches(&body(json!({
            "layoutOwner": "alice",
            "layoutName": "Roses"
        }))));
        assert!(!filter.matches(&body(json!({"layoutOwner": "alice"}))));
    }

    #[test]
    fn test_eq_opt_skips_none() {
        let filter = Filter::all().eq_opt("commonName", None::<String>);
        assert_eq!(filter, Filter::all());
    }

    #[test]
    fn test_document_into_json_adds_id() {
        let id = Uuid::new_v4();
        let doc = Document {
            id,
            body: body(json!({"commonName": "Rose"})),
        };
        assert_eq!(
            doc.into_json(),
            json!({"_id": id.to_string(), "commonName": "Rose"})
        );
    }
}
