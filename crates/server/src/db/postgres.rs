//! `PostgreSQL` backend: one JSONB table for every collection.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, StoreError, UNIQUE_INDEXES};

type DocumentRow = (Uuid, Json<Value>);

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a connection pool with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations from `crates/server/migrations/`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let id = Uuid::new_v4();
        let body = Value::Object(body);

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(Json(&body))
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;

        into_document((id, Json(body)))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY seq
            ",
        )
        .bind(collection)
        .bind(Json(filter.to_json()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_document).collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY seq
            LIMIT 1
            ",
        )
        .bind(collection)
        .bind(Json(filter.to_json()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_document).transpose()
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(patch)))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(collection, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn into_document((id, Json(body)): DocumentRow) -> Result<Document, StoreError> {
    match body {
        Value::Object(body) => Ok(Document { id, body }),
        other => Err(StoreError::DataCorruption(format!(
            "document {id} is not an object: {other}"
        ))),
    }
}

/// Translate unique index violations into `StoreError::Conflict`.
fn map_write_error(collection: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let field = db_err
            .constraint()
            .and_then(|name| UNIQUE_INDEXES.iter().find(|index| index.name == name))
            .map_or("unknown", |index| index.field);
        return StoreError::Conflict {
            collection: collection.to_owned(),
            field,
        };
    }
    StoreError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    // These need a real database.
    // Run with: DATABASE_URL=postgres://... cargo test -p garden-planner-server -- --ignored

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    async fn seed_roses(store: &PgDocumentStore) {
        for (name, n) in [("Rose", 1), ("Tulip", 2), ("Rose", 3)] {
            store
                .insert("Roses", body(json!({"commonName": name, "n": n})))
                .await
                .unwrap();
        }
    }

    fn ns(documents: &[Document]) -> Vec<&Value> {
        documents.iter().filter_map(|d| d.body.get("n")).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires database"]
    async fn test_find_returns_insertion_order(pool: PgPool) {
        let store = PgDocumentStore::from_pool(pool);
        seed_roses(&store).await;

        let all = store.find("Roses", &Filter::all()).await.unwrap();
        assert_eq!(ns(&all), [&json!(1), &json!(2), &json!(3)]);

        let other = store.find("Tulips", &Filter::all()).await.unwrap();
        assert!(other.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires database"]
    async fn test_equality_filter(pool: PgPool) {
        let store = PgDocumentStore::from_pool(pool);
        seed_roses(&store).await;

        let roses = store
            .find("Roses", &Filter::all().eq("commonName", "Rose"))
            .await
            .unwrap();
        assert_eq!(ns(&roses), [&json!(1), &json!(3)]);

        let first = store
            .find_one("Roses", &Filter::all().eq("commonName", "Rose"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.body["n"], json!(1));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires database"]
    async fn test_update_merges_top_level_fields(pool: PgPool) {
        let store = PgDocumentStore::from_pool(pool);
        let doc = store
            .insert("User", body(json!({"username": "alice", "password": "old"})))
            .await
            .unwrap();

        assert!(
            store
                .update("User", doc.id, body(json!({"password": "new"})))
                .await
                .unwrap()
        );
        assert!(
            !store
                .update("User", Uuid::new_v4(), body(json!({"password": "x"})))
                .await
                .unwrap()
        );

        let found = store
            .find_one("User", &Filter::all().eq("username", "alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, doc.id);
        assert_eq!(
            Value::Object(found.body),
            json!({"username": "alice", "password": "new"})
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires database"]
    async fn test_unique_indexes_map_to_conflict(pool: PgPool) {
        let store = PgDocumentStore::from_pool(pool);
        store
            .insert("User", body(json!({"username": "alice", "email": "a@x"})))
            .await
            .unwrap();

        let err = store
            .insert("User", body(json!({"username": "alice", "email": "b@x"})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                field: "username",
                ..
            }
        ));

        let bob = store
            .insert("User", body(json!({"username": "bob", "email": "b@x"})))
            .await
            .unwrap();
        let err = store
            .update("User", bob.id, body(json!({"email": "a@x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "email", .. }));

        // The indexes only cover the User collection.
        store
            .insert("Layout", body(json!({"username": "alice"})))
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires database"]
    async fn test_ping(pool: PgPool) {
        let store = PgDocumentStore::from_pool(pool);
        store.ping().await.unwrap();
    }
}
