use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GeofenceError;

/// A planar (lat, lng) coordinate pair in degrees.
///
/// Coordinates are treated as Euclidean pairs, not as points on a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Return the point unchanged if both coordinates are finite
    pub fn validate(self) -> Result<Self, GeofenceError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(GeofenceError::InvalidPoint {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}
