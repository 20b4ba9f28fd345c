//! Account route handlers: signup, login, logout, and password change.
//!
//! There are no sessions. A successful login only echoes the username, and
//! logout is acknowledged without doing anything server-side.

use axum::{Json, extract::State};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::{MessageResponse, message};
use crate::error::{ErrorContext, Result};
use crate::extract::JsonBody;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Signup body. Every field is required.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Password change body.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub username: Option<String>,
    pub oldpassword: Option<String>,
    pub newpassword: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub username: String,
}

/// Move a plaintext password out of the request, treating empty as absent.
fn secret(password: Option<String>) -> Option<SecretString> {
    password.filter(|p| !p.is_empty()).map(SecretString::from)
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /signup`
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignupRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.db())
        .signup(body.email, body.username, secret(body.password))
        .await
        .context("Error saving user data")?;

    Ok(message("User signed up successfully!"))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.db())
        .login(body.username.as_deref(), secret(body.password))
        .await
        .context("Server error")?;

    tracing::info!(username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        username: user.entity.username,
    }))
}

/// `POST /logout`
pub async fn logout() -> Json<MessageResponse> {
    message("Logout successful")
}

/// `POST /change-password`
pub async fn change_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.db())
        .change_password(
            body.username.as_deref(),
            secret(body.oldpassword),
            secret(body.newpassword),
        )
        .await
        .context("Server error")?;

    Ok(message("Password changed successfully"))
}
