//! HTTP middleware.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS
//! 4. Session layer (tower-sessions, `PostgreSQL` or memory store)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireVendor, clear_current_identity, set_current_identity,
};
pub use session::{BazaarSessionLayer, create_session_layer};
