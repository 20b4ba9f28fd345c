//! Password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on Tokio's blocking
//! pool instead of an async worker thread.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::task::JoinError;

/// bcrypt cost factor for new digests.
pub const BCRYPT_COST: u32 = 10;

/// Errors from the hashing backend.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// bcrypt rejected the input or digest.
    #[error("bcrypt error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// The blocking task panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    Join(#[from] JoinError),
}

/// Hash a plaintext password into a bcrypt digest.
///
/// # Errors
///
/// Returns `CredentialError` if hashing fails.
pub async fn hash_password(password: SecretString) -> Result<String, CredentialError> {
    let digest =
        tokio::task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), BCRYPT_COST))
            .await??;
    Ok(digest)
}

/// Check a plaintext password against a stored digest.
///
/// # Errors
///
/// Returns `CredentialError::Hash` if the digest is malformed.
pub async fn verify_password(
    password: SecretString,
    digest: String,
) -> Result<bool, CredentialError> {
    let matches =
        tokio::task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &digest))
            .await??;
    Ok(matches)
}
