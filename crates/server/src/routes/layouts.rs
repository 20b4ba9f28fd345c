//! Layout route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::Stored;
use crate::error::{AppError, ErrorContext, Result};
use crate::extract::JsonBody;
use crate::models::{Layout, ValidationError, required};
use crate::state::AppState;

/// Body of `POST /user/layout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLayoutRequest {
    pub layout_name: Option<String>,
    /// Grid cells, stored as sent.
    pub layout: Option<Vec<Value>>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveLayoutResponse {
    pub message: &'static str,
    pub layout: Stored<Layout>,
}

/// `POST /user/layout`
///
/// The owner must exist; a missing user is answered with 400, not 404.
pub async fn save(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SaveLayoutRequest>,
) -> Result<(StatusCode, Json<SaveLayoutResponse>)> {
    let username = required(body.username, "username")?;
    let user = state
        .db()
        .users()
        .find_by_username(&username)
        .await
        .context("Server error")?
        .ok_or_else(|| AppError::BadRequest("User not found".to_owned()))?;

    let grid = body
        .layout
        .ok_or(ValidationError::Required { field: "layout" })?;
    let layout = Layout {
        user_id: user.id,
        username: user.entity.username,
        layout_name: body.layout_name.unwrap_or_default(),
        grid,
    };

    let layout = state
        .db()
        .layouts()
        .insert(layout)
        .await
        .context("Server error")?;

    tracing::info!(
        username = %layout.username,
        layout_name = %layout.layout_name,
        "layout saved"
    );
    Ok((
        StatusCode::CREATED,
        Json(SaveLayoutResponse {
            message: "Layout saved successfully!",
            layout,
        }),
    ))
}

/// `GET /user/{username}/layouts`
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Stored<Layout>>>> {
    let layouts = state
        .db()
        .layouts()
        .find_by_username(&username)
        .await
        .context("Server error")?;
    Ok(Json(layouts))
}

/// `GET /layouts`
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Stored<Layout>>>> {
    let layouts = state
        .db()
        .layouts()
        .find_all()
        .await
        .context("Server error")?;
    Ok(Json(layouts))
}
