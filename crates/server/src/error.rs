//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Clients only ever see a short message in a JSON body (`{"message": ...}`,
//! or `{"error": ...}` through [`ErrorKeyed`]). Store and hashing failures
//! carry the route's client message as `context`, while the source error is
//! logged and reported.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::services::auth::AuthError;
use crate::services::credentials::CredentialError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Wrong username or password.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// A required field was missing.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Store operation failed.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Password hashing failed.
    #[error("{context}: {source}")]
    Credential {
        context: &'static str,
        source: CredentialError,
    },
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_)
            | Self::InvalidCredential(_)
            | Self::Validation(_)
            | Self::Store {
                source: StoreError::Validation(_),
                ..
            } => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Store { .. } | Self::Credential { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::InvalidCredential(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Validation(err)
            | Self::Store {
                source: StoreError::Validation(err),
                ..
            } => err.to_string(),
            // Don't expose internal error details to clients
            Self::Store { context, .. } | Self::Credential { context, .. } => {
                (*context).to_owned()
            }
        }
    }

    /// Log the error, and capture server errors to Sentry.
    fn report(&self) {
        match self {
            Self::Store {
                source: StoreError::Conflict { collection, field },
                ..
            } => {
                tracing::warn!(
                    error = %self,
                    collection = %collection,
                    field = %field,
                    "Uniqueness violation"
                );
            }
            _ if self.status().is_server_error() => {
                let event_id = sentry::capture_error(self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
            }
            _ => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }
    }

    fn into_response_with_key(self, key: &str) -> Response {
        self.report();
        let status = self.status();
        let body = json!({ key: self.client_message() });
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with_key("message")
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::BadRequest("Invalid request body".to_owned())
    }
}

/// Renders the wrapped error as `{"error": ...}` instead of `{"message": ...}`.
#[derive(Debug)]
pub struct ErrorKeyed(pub AppError);

impl IntoResponse for ErrorKeyed {
    fn into_response(self) -> Response {
        self.0.into_response_with_key("error")
    }
}

/// Attach the client-facing message for a failed operation.
pub trait ErrorContext<T> {
    /// Convert the error into an `AppError`, using `context` as the message
    /// for failures the client can't act on.
    ///
    /// # Errors
    ///
    /// Returns the converted error if `self` is `Err`.
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, StoreError> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| AppError::Store { context, source })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, CredentialError> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| AppError::Credential { context, source })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, AuthError> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|err| match err {
            AuthError::Validation(err) => AppError::Validation(err),
            AuthError::InvalidCredentials => {
                AppError::InvalidCredential("Invalid username or password".to_owned())
            }
            AuthError::UserNotFound => AppError::NotFound("User not found".to_owned()),
            AuthError::IncorrectPassword => {
                AppError::BadRequest("Old password is incorrect".to_owned())
            }
            AuthError::Store(source) => AppError::Store { context, source },
            AuthError::Credential(source) => AppError::Credential { context, source },
        })
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
