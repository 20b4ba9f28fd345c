//! Garden Planner API server library.
//!
//! This crate provides the JSON API as a library, allowing it to be tested
//! and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router: API routes, static fallback, and the
/// middleware stack.
pub fn build_app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);
    let tls = state.config().tls;

    let api = routes::routes()
        .fallback_service(static_dir)
        .layer(axum::middleware::from_fn_with_state(
            tls,
            middleware::https_redirect_middleware,
        ));

    Router::new()
        .merge(routes::health_routes())
        .merge(api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
