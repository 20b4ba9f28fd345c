//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                 - Liveness check
//! GET    /health/ready                           - Readiness check (pings the store)
//!
//! # Accounts
//! POST   /signup                                 - Create an account
//! POST   /login                                  - Check username and password
//! POST   /logout                                 - Acknowledge logout
//! POST   /change-password                        - Replace a password
//!
//! # Layouts
//! POST   /user/layout                            - Save a layout
//! GET    /user/{username}/layouts                - A user's layouts
//! GET    /layouts                                - All layouts
//!
//! # Favorites
//! POST   /user/{username}/favorites              - Add or remove a favorite
//! GET    /user/{username}/favorites              - List favorites
//! DELETE /user/{username}/favorites/{plant_id}   - Remove a favorite
//!
//! # Catalog
//! GET    /data/{collection_name}?commonName=     - Query a catalog collection
//!
//! # Comments
//! POST   /comments                               - Comment on a layout
//! GET    /comments?layoutOwner=&layoutName=      - Comments on a layout
//! ```
//!
//! Every other path falls through to the static asset directory. Only the
//! health routes bypass the HTTPS redirect.

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod layouts;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Body of responses that only carry a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Respond with `{"message": msg}`.
pub(crate) const fn message(msg: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message: msg })
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
}

/// Create the per-user routes router (mounted at `/user`).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/layout", post(layouts::save))
        .route("/{username}/layouts", get(layouts::list_for_user))
        .route(
            "/{username}/favorites",
            get(favorites::list).post(favorites::update),
        )
        .route(
            "/{username}/favorites/{plant_id}",
            delete(favorites::remove),
        )
}

/// Create the liveness and readiness routes.
///
/// These stay reachable over plain HTTP so probes inside the deployment
/// network are never redirected.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create all API routes, excluding health checks.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .nest("/user", user_routes())
        .route("/layouts", get(layouts::list_all))
        .route("/data/{collection_name}", get(catalog::list))
        .route("/comments", get(comments::list).post(comments::create))
}
