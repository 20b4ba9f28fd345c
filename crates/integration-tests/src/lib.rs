//! Integration tests for Garden Planner.
//!
//! Tests drive the full router from `garden_planner_server::build_app` with
//! `tower::ServiceExt::oneshot` against the in-memory document store, so no
//! database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p garden-planner-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use garden_planner_server::build_app;
use garden_planner_server::config::ServerConfig;
use garden_planner_server::db::Database;
use garden_planner_server::state::AppState;
use secrecy::SecretString;
use serde_json::{Map, Value};
use tower::ServiceExt;

/// A router plus a handle to its store for direct assertions.
pub struct TestApp {
    pub router: Router,
    pub db: Database,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Fresh app over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let db = Database::in_memory();
        let config = ServerConfig::local(SecretString::from("postgres://unused"));
        let router = build_app(AppState::new(config, db.clone()));
        Self { router, db }
    }

    /// Send a request and decode the JSON response (or `Null` for an empty body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Sign up a user, asserting success.
    pub async fn signup(&self, email: &str, username: &str, password: &str) {
        let (status, body) = self
            .post(
                "/signup",
                serde_json::json!({
                    "email": email,
                    "username": username,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    }

    /// Insert catalog documents directly into a collection.
    pub async fn seed_catalog(&self, collection: &str, documents: Value) {
        let Value::Array(documents) = documents else {
            panic!("seed_catalog expects an array");
        };
        let target = self.db.collection(collection);
        for document in documents {
            let Value::Object(body) = document else {
                panic!("catalog documents must be objects");
            };
            target.insert(body).await.expect("Failed to seed catalog");
        }
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.db
            .collection(collection)
            .find(&garden_planner_server::db::Filter::all())
            .await
            .expect("Failed to count documents")
            .len()
    }
}

/// Collect string field `key` from every object in a JSON array.
#[must_use]
pub fn field_values(array: &Value, key: &str) -> Vec<String> {
    array
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key).and_then(Value::as_str).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Drop `_id` and `timestamp` so documents can be compared by content.
#[must_use]
pub fn without_generated(value: &Value) -> Value {
    let mut map: Map<String, Value> = value.as_object().cloned().unwrap_or_default();
    map.remove("_id");
    map.remove("timestamp");
    Value::Object(map)
}
