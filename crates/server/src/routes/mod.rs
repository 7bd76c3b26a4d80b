//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Store readiness
//!
//! # Auth
//! POST   /api/auth/register            - Create an account and sign in
//! POST   /api/auth/login               - Sign in
//! POST   /api/auth/logout              - Sign out
//! GET    /api/auth/me                  - Current identity
//!
//! # Directory (public)
//! GET    /api/vendors                  - Every vendor
//! GET    /api/vendors/{id}             - Vendor, catalog and share link
//! GET    /api/map/center?lat&lng       - Where to centre the map
//!
//! # Dashboard (vendor accounts only)
//! GET    /api/dashboard/vendor?lat&lng - Own record and items, or a draft
//! PUT    /api/dashboard/vendor         - Create or update own record
//! DELETE /api/dashboard/vendor         - Delete own record and catalog
//! POST   /api/dashboard/items          - Add an item
//! DELETE /api/dashboard/items/{id}     - Remove an item
//! ```

pub mod auth;
pub mod dashboard;
pub mod vendors;

use axum::{
    Router,
    routing::{delete, get, post},
};
use serde::Deserialize;

use smart_bazaar_core::Coordinates;

use crate::error::AppError;
use crate::geolocation::ClientReported;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the public directory routes router.
pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/vendors", get(vendors::list))
        .route("/vendors/{id}", get(vendors::detail))
        .route("/map/center", get(vendors::map_center))
}

/// Create the vendor dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/vendor",
            get(dashboard::show)
                .put(dashboard::save)
                .delete(dashboard::delete),
        )
        .route("/items", post(dashboard::add_item))
        .route("/items/{id}", delete(dashboard::remove_item))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/dashboard", dashboard_routes())
        .merge(directory_routes());

    Router::new().nest("/api", api)
}

/// Optional device position sent by the browser as `?lat=..&lng=..`.
#[derive(Debug, Default, Deserialize)]
pub struct PositionQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl PositionQuery {
    /// The reported position as a geolocation source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the coordinates are out of range.
    pub fn source(&self) -> Result<ClientReported, AppError> {
        Coordinates::from_parts(self.lat, self.lng)
            .map(ClientReported)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}
