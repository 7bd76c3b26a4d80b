//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BazaarConfig;
use crate::identity::{IdentityProvider, LocalIdentityProvider};
use crate::store::{DocumentStore, MemoryStore, PgDocumentStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// document store, the identity provider and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BazaarConfig,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: BazaarConfig, pool: PgPool) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool.clone()));
        Self::build(config, store, Some(pool))
    }

    /// Create state backed by an in-process [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: BazaarConfig, store: MemoryStore) -> Self {
        Self::build(config, Arc::new(store), None)
    }

    /// Create state over any document store. Sessions are kept in memory.
    #[must_use]
    pub fn with_store(config: BazaarConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self::build(config, store, None)
    }

    fn build(config: BazaarConfig, store: Arc<dyn DocumentStore>, pool: Option<PgPool>) -> Self {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(LocalIdentityProvider::new(Arc::clone(&store)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                identity,
                pool,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &BazaarConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// The database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
