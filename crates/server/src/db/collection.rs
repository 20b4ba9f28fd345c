//! Typed and untyped handles to a single collection.

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Document, DocumentStore, Filter, StoreError};
use crate::models::Entity;

/// A document decoded into its entity type, with its ID.
///
/// Serializes as the entity's fields plus `_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct Stored<T: Entity> {
    #[serde(rename = "_id")]
    pub id: T::Id,
    #[serde(flatten)]
    pub entity: T,
}

impl<T: Entity> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.entity
    }
}

impl<T: Entity> TryFrom<Document> for Stored<T> {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, StoreError> {
        let entity = serde_json::from_value(Value::Object(doc.body)).map_err(|e| {
            StoreError::DataCorruption(format!(
                "invalid {} document {}: {e}",
                T::COLLECTION,
                doc.id
            ))
        })?;
        Ok(Self {
            id: doc.id.into(),
            entity,
        })
    }
}

/// Collection of one entity type.
///
/// Every write runs [`Entity::validate`] first; rejected documents never
/// reach the store.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Collection<T> {
    pub(super) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Validate and insert a new document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if a required field is missing, or
    /// `StoreError::Conflict` if a unique index rejects the document.
    pub async fn insert(&self, entity: T) -> Result<Stored<T>, StoreError> {
        entity.validate()?;
        let doc = self.store.insert(T::COLLECTION, to_body(&entity)?).await?;
        Ok(Stored {
            id: doc.id.into(),
            entity,
        })
    }

    /// All documents matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document cannot be decoded.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Stored<T>>, StoreError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Stored::try_from)
            .collect()
    }

    /// First document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or the document cannot be decoded.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Stored<T>>, StoreError> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(Stored::try_from)
            .transpose()
    }

    /// Overwrite one top-level field of a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document has this ID.
    pub(super) async fn set_field(
        &self,
        id: T::Id,
        field: &str,
        value: impl Serialize + Send,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)
            .map_err(|e| StoreError::DataCorruption(format!("cannot encode {field}: {e}")))?;
        let mut patch = Map::new();
        patch.insert(field.to_owned(), value);

        if self.store.update(T::COLLECTION, id.into(), patch).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

fn to_body<T: Serialize>(entity: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(body)) => Ok(body),
        Ok(other) => Err(StoreError::DataCorruption(format!(
            "entity serialized to a non-object: {other}"
        ))),
        Err(e) => Err(StoreError::DataCorruption(format!(
            "cannot encode entity: {e}"
        ))),
    }
}

/// Collection accessed by name, without a schema.
///
/// Used for the externally populated plant catalog collections.
pub struct RawCollection {
    store: Arc<dyn DocumentStore>,
    name: String,
}

impl RawCollection {
    pub(super) fn new(store: Arc<dyn DocumentStore>, name: &str) -> Self {
        Self {
            store,
            name: name.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All documents matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        self.store.find(&self.name, filter).await
    }

    /// Insert a document as-is.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn insert(&self, body: Map<String, Value>) -> Result<Document, StoreError> {
        self.store.insert(&self.name, body).await
    }
}
