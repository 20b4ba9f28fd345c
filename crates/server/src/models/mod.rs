//! Document schemas stored by the server.
//!
//! Each schema implements [`Entity`], which names its collection and runs the
//! validation stage every typed write goes through before it reaches the
//! store.
//!
//! # Collections
//!
//! - `User` - accounts, password digests, and favorites
//! - `Layout` - saved garden grids
//! - `Comments` - comments on layouts

pub mod comment;
pub mod layout;
pub mod user;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

pub use comment::Comment;
pub use layout::Layout;
pub use user::User;

/// Collections owned by this server. All other collection names refer to
/// externally populated catalog data.
pub const OWNED_COLLECTIONS: &[&str] = &[
    User::COLLECTION,
    Layout::COLLECTION,
    Comment::COLLECTION,
];

/// A write was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("{field} is required")]
    Required { field: &'static str },
}

/// A document type stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name in the document store.
    const COLLECTION: &'static str;

    /// Typed document ID.
    type Id: From<Uuid> + Into<Uuid> + Copy + Serialize + Send + Sync + std::fmt::Debug;

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first missing field.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Unwrap a required request field, treating empty strings as missing.
///
/// # Errors
///
/// Returns `ValidationError::Required` if the value is `None` or empty.
pub fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required { field }),
    }
}

/// Fail with `ValidationError::Required` if `value` is empty.
pub(crate) fn ensure_present(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}
