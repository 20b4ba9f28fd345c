//! In-process backend used by tests and `Database::in_memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, StoreError, UNIQUE_INDEXES};

/// Document store held in memory. Collections keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reject `body` if it repeats a uniquely indexed value held by another
/// document in the collection.
fn check_unique(
    collection: &str,
    documents: &[Document],
    body: &Map<String, Value>,
    exclude: Option<Uuid>,
) -> Result<(), StoreError> {
    for index in UNIQUE_INDEXES.iter().filter(|i| i.collection == collection) {
        let Some(value) = body.get(index.field).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = documents
            .iter()
            .filter(|doc| Some(doc.id) != exclude)
            .any(|doc| doc.body.get(index.field) == Some(value));
        if taken {
            return Err(StoreError::Conflict {
                collection: collection.to_owned(),
                field: index.field,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_owned()).or_default();
        check_unique(collection, documents, &body, None)?;

        let document = Document {
            id: Uuid::new_v4(),
            body,
        };
        documents.push(document.clone());
        Ok(document)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|doc| filter.matches(&doc.body))
                .cloned()
        }))
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(current) = documents.iter().find(|doc| doc.id == id) else {
            return Ok(false);
        };

        let mut body = current.body.clone();
        body.extend(patch);
        check_unique(collection, documents, &body, Some(id))?;
        if let Some(doc) = documents.iter_mut().find(|doc| doc.id == id) {
            doc.body = body;
        }
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
