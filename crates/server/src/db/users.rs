//! `User` collection queries.

use garden_planner_core::{FavoriteSet, UserId};

use super::{Collection, Filter, StoreError, Stored};
use crate::models::User;

impl Collection<User> {
    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Stored<User>>, StoreError> {
        self.find_one(&Filter::all().eq("username", username)).await
    }

    /// Replace a user's password digest.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user no longer exists.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        self.set_field(id, "password", password_hash).await
    }

    /// Persist a user's full favorites list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user no longer exists.
    pub async fn save_favorites(
        &self,
        id: UserId,
        favorites: &FavoriteSet,
    ) -> Result<(), StoreError> {
        self.set_field(id, "favorites", favorites).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_planner_core::{Favorite, PlantId};

    use crate::db::{Database, StoreError};
    use crate::models::{User, ValidationError};

    fn alice() -> User {
        User::new("a@x.com".into(), "alice".into(), "$2b$10$digest".into())
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let db = Database::in_memory();
        let users = db.users();
        let stored = users.insert(alice()).await.unwrap();

        let found = users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert_eq!(found.email, "a@x.com");
        assert!(users.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_requires_fields() {
        let db = Database::in_memory();
        let err = db
            .users()
            .insert(User::new("a@x.com".into(), String::new(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { field: "username" })
        ));
        assert!(db.users().find_by_username("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let db = Database::in_memory();
        db.users().insert(alice()).await.unwrap();
        let err = db
            .users()
            .insert(User::new("a@x.com".into(), "alice2".into(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_update_password_and_favorites() {
        let db = Database::in_memory();
        let users = db.users();
        let stored = users.insert(alice()).await.unwrap();

        users.update_password(stored.id, "$2b$10$new").await.unwrap();

        let mut favorites = stored.favorites.clone();
        favorites.insert(Favorite::new(PlantId::parse("p1").unwrap()));
        users.save_favorites(stored.id, &favorites).await.unwrap();

        let found = users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "$2b$10$new");
        assert_eq!(found.favorites, favorites);
        assert_eq!(found.email, "a@x.com");
    }
}
