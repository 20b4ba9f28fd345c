//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::services::credentials::CredentialError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required request field was missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown username or wrong password at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// The current password given for a password change was wrong.
    #[error("old password is incorrect")]
    IncorrectPassword,

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing error.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}
