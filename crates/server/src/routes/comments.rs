//! Layout comment route handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::db::Stored;
use crate::error::{AppError, ErrorContext, Result};
use crate::extract::JsonBody;
use crate::models::Comment;
use crate::state::AppState;

/// Body of `POST /comments`. All fields are required and non-empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub layout_owner: Option<String>,
    pub layout_name: Option<String>,
    pub username: Option<String>,
    pub comment_text: Option<String>,
}

impl CreateCommentRequest {
    fn into_comment(self) -> Option<Comment> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Comment::new(
            present(self.layout_owner)?,
            present(self.layout_name)?,
            present(self.username)?,
            present(self.comment_text)?,
        ))
    }
}

/// Query of `GET /comments`. Absent keys match any value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub layout_owner: Option<String>,
    pub layout_name: Option<String>,
}

/// `POST /comments`
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Stored<Comment>>)> {
    let comment = body
        .into_comment()
        .ok_or_else(|| AppError::BadRequest("All fields are required".to_owned()))?;

    let comment = state
        .db()
        .comments()
        .insert(comment)
        .await
        .context("Error saving comment")?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /comments`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Vec<Stored<Comment>>>> {
    let comments = state
        .db()
        .comments()
        .find_for_layout(query.layout_owner.as_deref(), query.layout_name.as_deref())
        .await
        .context("Error fetching comments")?;
    Ok(Json(comments))
}
