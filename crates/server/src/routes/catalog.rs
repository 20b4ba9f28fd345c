//! Plant catalog lookups.
//!
//! Catalog collections (for example `Roses`) are loaded with `gp-cli import`
//! and read here without a schema. Collections owned by the server are not
//! exposed through this route.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::Filter;
use crate::error::{AppError, Result};
use crate::models::OWNED_COLLECTIONS;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Exact match on `commonName`. Empty means no filter.
    pub common_name: Option<String>,
}

/// `GET /data/{collection_name}`
pub async fn list(
    State(state): State<AppState>,
    Path(collection_name): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Value>>> {
    if OWNED_COLLECTIONS.contains(&collection_name.as_str()) {
        return Err(AppError::NotFound(format!(
            "Collection not found: {collection_name}"
        )));
    }

    let filter = Filter::all().eq_opt(
        "commonName",
        query.common_name.filter(|name| !name.is_empty()),
    );
    let documents = state
        .db()
        .collection(&collection_name)
        .find(&filter)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, collection = %collection_name, "Catalog query failed");
            AppError::Internal(format!(
                "Error fetching data from collection: {collection_name}"
            ))
        })?;

    Ok(Json(documents.into_iter().map(|doc| doc.into_json()).collect()))
}
