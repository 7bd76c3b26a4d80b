//! Session middleware configuration.
//!
//! Sessions are kept in `PostgreSQL` when the server has a database, and in
//! memory otherwise.

use axum::Router;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::BazaarConfig;
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bazaar_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer for whichever backend the state runs on.
pub enum BazaarSessionLayer {
    Postgres(SessionManagerLayer<PostgresStore>),
    Memory(SessionManagerLayer<MemoryStore>),
}

impl BazaarSessionLayer {
    /// Wrap every route of `router` in this layer.
    pub fn apply(self, router: Router<AppState>) -> Router<AppState> {
        match self {
            Self::Postgres(layer) => router.layer(layer),
            Self::Memory(layer) => router.layer(layer),
        }
    }
}

/// Create the session layer.
///
/// The `PostgreSQL` sessions table must exist (see `bazaar-cli migrate`).
#[must_use]
pub fn create_session_layer(state: &AppState) -> BazaarSessionLayer {
    match state.pool() {
        Some(pool) => BazaarSessionLayer::Postgres(configure(
            PostgresStore::new(pool.clone()),
            state.config(),
        )),
        None => BazaarSessionLayer::Memory(configure(MemoryStore::default(), state.config())),
    }
}

fn configure<S: SessionStore>(store: S, config: &BazaarConfig) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
