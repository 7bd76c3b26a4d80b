//! Integration tests for Smart Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! # Manager and HTTP tests (in-memory store, no setup)
//! cargo test -p smart-bazaar-integration-tests
//!
//! # Include the PostgreSQL store tests
//! BAZAAR_TEST_DATABASE_URL=postgres://localhost/bazaar_test \
//!     cargo test -p smart-bazaar-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `vendor_flow` - managers against the memory store
//! - `http_api` - the axum router driven with `tower::ServiceExt::oneshot`
//! - `postgres_store` - the document store contract against `PostgreSQL`

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use smart_bazaar_server::store::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields, MemoryStore,
    StoreError,
};
use smart_bazaar_server::{AppState, BazaarConfig, app};

/// Configuration with every variable unset.
///
/// # Panics
///
/// Never; the defaults always parse.
#[must_use]
pub fn test_config() -> BazaarConfig {
    BazaarConfig::from_lookup(|_| None).expect("default configuration")
}

// ============================================================================
// HTTP client
// ============================================================================

/// The router plus a one-cookie jar, standing in for a browser.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// An app over a fresh memory store.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self::from_state(AppState::in_memory(test_config(), store))
    }

    /// An app over the given state.
    #[must_use]
    pub fn from_state(state: AppState) -> Self {
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// Forget the session cookie, as a second browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request, keeping any session cookie the server sets.
    ///
    /// Returns the status and the JSON body (`Null` when empty).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, json)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

// ============================================================================
// Store doubles
// ============================================================================

/// A store whose every call fails, as an unreachable database would.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

fn unreachable_store() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get_document(&self, _path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn set_document(
        &self,
        _path: &DocumentPath,
        _fields: Fields,
        _merge: bool,
    ) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn add_document(
        &self,
        _collection: &CollectionPath,
        _fields: Fields,
    ) -> Result<DocumentPath, StoreError> {
        Err(unreachable_store())
    }

    async fn create_document(&self, _path: &DocumentPath, _fields: Fields) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn delete_document(&self, _path: &DocumentPath) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn query_collection(
        &self,
        _collection: &CollectionPath,
        _filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable_store())
    }
}
