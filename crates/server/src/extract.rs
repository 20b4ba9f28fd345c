//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body whose rejection is an [`AppError`], so malformed bodies
/// get the same `{"message": ...}` shape as every other error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
