//! Authentication service.
//!
//! Accounts are identified by username. Passwords arrive as
//! [`SecretString`] and only their bcrypt digests are stored.

mod error;

pub use error::AuthError;

use secrecy::SecretString;

use crate::db::{Collection, Database, Stored};
use crate::models::{User, ValidationError, required};
use crate::services::credentials::{hash_password, verify_password};

/// Authentication service.
///
/// Handles signup, login, and password changes against the `User` collection.
pub struct AuthService {
    users: Collection<User>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { users: db.users() }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is missing.
    /// Returns `AuthError::Store` if the insert fails, including
    /// `StoreError::Conflict` for a taken email or username.
    pub async fn signup(
        &self,
        email: Option<String>,
        username: Option<String>,
        password: Option<SecretString>,
    ) -> Result<Stored<User>, AuthError> {
        let email = required(email, "email")?;
        let username = required(username, "username")?;
        let password = password.ok_or(ValidationError::Required { field: "password" })?;

        let password_hash = hash_password(password).await?;
        let user = self
            .users
            .insert(User::new(email, username, password_hash))
            .await?;

        tracing::info!(username = %user.username, "user signed up");
        Ok(user)
    }

    /// Check a username and password.
    ///
    /// Missing fields, an unknown username, and a wrong password are all
    /// reported as `AuthError::InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the credentials don't match.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<SecretString>,
    ) -> Result<Stored<User>, AuthError> {
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Replace a user's password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has this username.
    /// Returns `AuthError::IncorrectPassword` if `old_password` is wrong.
    /// Returns `AuthError::Validation` if `new_password` is missing.
    pub async fn change_password(
        &self,
        username: Option<&str>,
        old_password: Option<SecretString>,
        new_password: Option<SecretString>,
    ) -> Result<(), AuthError> {
        let user = match username {
            Some(username) => self.users.find_by_username(username).await?,
            None => None,
        }
        .ok_or(AuthError::UserNotFound)?;

        let Some(old_password) = old_password else {
            return Err(AuthError::IncorrectPassword);
        };
        if !verify_password(old_password, user.password_hash.clone()).await? {
            return Err(AuthError::IncorrectPassword);
        }

        let new_password = new_password.ok_or(ValidationError::Required {
            field: "newpassword",
        })?;
        let password_hash = hash_password(new_password).await?;
        self.users.update_password(user.id, &password_hash).await?;

        tracing::info!(username = %user.username, "password changed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::from(s))
    }

    async fn service_with_alice() -> AuthService {
        let service = AuthService::new(&Database::in_memory());
        service
            .signup(Some("a@x.com".into()), Some("alice".into()), secret("pw1"))
            .await
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = service_with_alice().await;
        let user = service.login(Some("alice"), secret("pw1")).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "pw1");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service_with_alice().await;
        for (username, password) in [
            (Some("alice"), secret("wrong")),
            (Some("nobody"), secret("pw1")),
            (None, secret("pw1")),
            (Some("alice"), None),
        ] {
            let err = service.login(username, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_signup_missing_field() {
        let service = AuthService::new(&Database::in_memory());
        let err = service
            .signup(Some("a@x.com".into()), None, secret("pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::Required { field: "username" })
        ));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username() {
        let service = service_with_alice().await;
        let err = service
            .signup(Some("b@x.com".into()), Some("alice".into()), secret("pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Store(crate::db::StoreError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = service_with_alice().await;
        service
            .change_password(Some("alice"), secret("pw1"), secret("pw2"))
            .await
            .unwrap();

        assert!(service.login(Some("alice"), secret("pw2")).await.is_ok());
        assert!(matches!(
            service.login(Some("alice"), secret("pw1")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_change_password_failures() {
        let service = service_with_alice().await;

        let err = service
            .change_password(Some("bob"), secret("pw1"), secret("pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));

        let err = service
            .change_password(Some("alice"), secret("nope"), secret("pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));

        // Password unchanged after a rejected attempt.
        assert!(service.login(Some("alice"), secret("pw1")).await.is_ok());
    }
}
