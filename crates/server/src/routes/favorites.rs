//! Favorite plant route handlers.
//!
//! Favorites are a set keyed by plant id. Adding a plant twice keeps the
//! first entry, and removing deletes every entry with that id.

use axum::{
    Json,
    extract::{Path, State},
};
use garden_planner_core::{Favorite, FavoriteSet, PlantId, Safety, UserId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{MessageResponse, message};
use crate::db::Stored;
use crate::error::{AppError, ErrorContext, ErrorKeyed, Result};
use crate::extract::JsonBody;
use crate::models::{User, ValidationError};
use crate::state::AppState;

/// Body of `POST /user/{username}/favorites`.
///
/// A truthy `favorited` adds the plant. `false`, `null`, `0`, `""` or a
/// missing field removes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFavoriteRequest {
    pub plant_id: Option<PlantId>,
    #[serde(default, deserialize_with = "truthy")]
    pub favorited: bool,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub safety: Option<Safety>,
    pub image: Option<String>,
    pub collection: Option<String>,
}

/// Accept any JSON value for a flag, reading it the way browser clients do.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

impl UpdateFavoriteRequest {
    fn into_favorite(self, plant_id: PlantId) -> Favorite {
        Favorite {
            plant_id,
            common_name: self.common_name,
            scientific_name: self.scientific_name,
            safety: self.safety,
            image: self.image,
            collection: self.collection,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateFavoriteResponse {
    pub message: &'static str,
    pub favorites: FavoriteSet,
}

/// Body of `GET /user/{username}/favorites`.
#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub favorites: FavoriteSet,
}

async fn find_user(state: &AppState, username: &str) -> Result<Stored<User>> {
    state
        .db()
        .users()
        .find_by_username(username)
        .await
        .context("Internal server error")?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
}

/// `POST /user/{username}/favorites`
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(body): JsonBody<UpdateFavoriteRequest>,
) -> Result<Json<UpdateFavoriteResponse>> {
    let Stored { id, entity: user } = find_user(&state, &username).await?;
    let mut favorites = user.favorites;

    let plant_id = body
        .plant_id
        .clone()
        .ok_or(ValidationError::Required { field: "plantId" })?;
    let changed = if body.favorited {
        favorites.insert(body.into_favorite(plant_id))
    } else {
        favorites.remove(&plant_id)
    };

    if changed {
        state
            .db()
            .users()
            .save_favorites(id, &favorites)
            .await
            .context("Internal server error")?;
    }

    Ok(Json(UpdateFavoriteResponse {
        message: "Favorite status updated",
        favorites,
    }))
}

/// `GET /user/{username}/favorites`
///
/// Errors on this route use `{"error": ...}` bodies.
pub async fn list(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> std::result::Result<Json<FavoritesResponse>, ErrorKeyed> {
    let user = state
        .db()
        .users()
        .find_by_username(&username)
        .await
        .context("An error occurred")
        .map_err(ErrorKeyed)?
        .ok_or_else(|| ErrorKeyed(AppError::NotFound("User not found".to_owned())))?;

    Ok(Json(FavoritesResponse {
        id: user.id,
        favorites: user.entity.favorites,
    }))
}

/// `DELETE /user/{username}/favorites/{plant_id}`
pub async fn remove(
    State(state): State<AppState>,
    Path((username, plant_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let Stored { id, entity: user } = find_user(&state, &username).await?;
    let plant_id = PlantId::parse(&plant_id).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut favorites = user.favorites;
    if favorites.remove(&plant_id) {
        state
            .db()
            .users()
            .save_favorites(id, &favorites)
            .await
            .context("Internal server error")?;
    }

    Ok(message("Plant removed from favorites"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn favorited(value: Value) -> bool {
        let body = json!({"plantId": "p1", "favorited": value});
        serde_json::from_value::<UpdateFavoriteRequest>(body)
            .unwrap()
            .favorited
    }

    #[test]
    fn test_favorited_accepts_any_json_value() {
        assert!(favorited(json!(true)));
        assert!(favorited(json!(1)));
        assert!(favorited(json!("yes")));
        assert!(favorited(json!({})));

        assert!(!favorited(json!(false)));
        assert!(!favorited(json!(null)));
        assert!(!favorited(json!(0)));
        assert!(!favorited(json!("")));
    }

    #[test]
    fn test_missing_favorited_means_remove() {
        let body: UpdateFavoriteRequest =
            serde_json::from_value(json!({"plantId": "p1"})).unwrap();
        assert!(!body.favorited);
    }
}
