//! Integration tests for the CoffeeCraft storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coffeecraft-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_engine` - Cart invariants across long operation sequences
//! - `file_persistence` - Cart round-trips through the file-backed store
//! - `storefront_api` - HTTP routes driven through the router in-process
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use coffeecraft_storefront::catalog::Catalog;
use coffeecraft_storefront::config::StorefrontConfig;
use coffeecraft_storefront::routes;
use coffeecraft_storefront::state::AppState;
use coffeecraft_storefront::storage::{KeyValueStore, MemoryStore};
use tower::ServiceExt;

/// Checkout delay used by test apps.
pub const TEST_CHECKOUT_DELAY: Duration = Duration::from_millis(2000);

/// An application wired to an in-memory store.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Build an app with the built-in catalog and an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Build an app over an existing store.
    #[must_use]
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let config = StorefrontConfig {
            checkout_delay: TEST_CHECKOUT_DELAY,
            ..StorefrontConfig::default()
        };
        let kv: Arc<dyn KeyValueStore> = store.clone();
        let state = AppState::new(config, Catalog::builtin(), kv);
        Self { state, store }
    }

    /// The router under test.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::app(self.state.clone())
    }

    /// Send a GET and return the status and parsed JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a JSON POST and return the status and parsed JSON body.
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
