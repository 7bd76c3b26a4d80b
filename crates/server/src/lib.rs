//! Smart Bazaar server.
//!
//! A directory of local street vendors. Vendors sign up, describe their
//! shop and keep a small catalog; customers browse every vendor on a map
//! and open a vendor page with its items.
//!
//! # Architecture
//!
//! - [`store`] - schemaless document store (`PostgreSQL` JSONB or memory)
//! - [`identity`] - sign-up/sign-in behind the `IdentityProvider` trait
//! - [`geolocation`] - device position with a fixed fallback
//! - [`services`] - vendor profile, catalog and directory logic
//! - [`routes`] - JSON API over axum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod geolocation;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::BazaarConfig;
pub use state::AppState;

/// Build the application router.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(&state);

    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes());

    session_layer
        .apply(router)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the document store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
