//! User account document.

use garden_planner_core::{FavoriteSet, UserId};
use serde::{Deserialize, Serialize};

use super::{Entity, ValidationError, ensure_present};

/// A user account.
///
/// `password_hash` is the bcrypt digest stored under the `password` key.
/// `Debug` is implemented manually so the digest never reaches logs, and the
/// type is never serialized into an HTTP response.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub favorites: FavoriteSet,
}

impl User {
    /// Create a user with no favorites.
    #[must_use]
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            email,
            username,
            password_hash,
            favorites: FavoriteSet::new(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("favorites", &self.favorites.len())
            .finish()
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "User";
    type Id = UserId;

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_present(&self.email, "email")?;
        ensure_present(&self.username, "username")?;
        ensure_present(&self.password_hash, "password")
    }
}
