//! Geolocation source adapter.
//!
//! The device position is only ever used to pre-fill a new vendor's shop
//! location or to centre the customer map. Both fall back to
//! [`Coordinates::DEFAULT`] when no position is available.

use async_trait::async_trait;
use thiserror::Error;

use smart_bazaar_core::Coordinates;

/// Errors reported by a geolocation source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    /// The source cannot provide a position (no permission, no fix, no
    /// coordinates sent by the client).
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// One-shot current position.
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    /// Current position.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A source that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl GeolocationSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// A source that never has a position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl GeolocationSource for Unavailable {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable("no position source".to_string()))
    }
}

/// Position reported by an HTTP client, if it sent one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientReported(pub Option<Coordinates>);

#[async_trait]
impl GeolocationSource for ClientReported {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or_else(|| {
            GeolocationError::Unavailable("client did not report a position".to_string())
        })
    }
}

/// Resolve a position, falling back to `fallback` on failure.
///
/// Returns the position and whether it came from the source.
pub async fn position_or(
    source: &dyn GeolocationSource,
    fallback: Coordinates,
) -> (Coordinates, bool) {
    match source.current_position().await {
        Ok(position) => (position, true),
        Err(e) => {
            tracing::warn!(error = %e, "Geolocation failed, using default location");
            (fallback, false)
        }
    }
}
