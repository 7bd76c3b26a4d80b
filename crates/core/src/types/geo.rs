//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinatesError {
    /// Latitude outside -90..=90 (or not finite).
    #[error("latitude must be between -90 and 90 (got {0})")]
    Latitude(f64),
    /// Longitude outside -180..=180 (or not finite).
    #[error("longitude must be between -180 and 180 (got {0})")]
    Longitude(f64),
}

/// A WGS84 position in decimal degrees.
///
/// Serialized as `{ "lat": .., "lng": .. }`, the shape vendor documents use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees north of the equator.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Degrees east of Greenwich.
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    /// Fallback position (New Delhi) used when geolocation is unavailable.
    pub const DEFAULT: Self = Self {
        latitude: 28.6139,
        longitude: 77.2090,
    };

    /// Create validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Validate an optional latitude/longitude pair, as sent by a client
    /// that may or may not have a position fix.
    ///
    /// Returns `None` unless both components are present.
    ///
    /// # Errors
    ///
    /// Returns an error if both are present but out of range.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoordinatesError> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(28.6, 77.2).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinatesError::Latitude(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -181.0),
            Err(CoordinatesError::Longitude(-181.0))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert_eq!(Coordinates::from_parts(Some(1.0), None), Ok(None));
        assert_eq!(Coordinates::from_parts(None, None), Ok(None));
        assert!(Coordinates::from_parts(Some(1.0), Some(2.0)).unwrap().is_some());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Coordinates::new(28.6, 77.2).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 28.6, "lng": 77.2 }));
    }
}
