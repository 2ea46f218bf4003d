//! Error types for fence construction and tracking.

use thiserror::Error;

/// Errors returned by the geofence engine.
///
/// None of these are fatal: every variant leaves the caller's state intact
/// and can be recovered from locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofenceError {
    /// A fence draft was finished with fewer than three vertices.
    #[error("need at least 3 points to create a fence, have {count}")]
    InsufficientVertices { count: usize },

    /// A polygon had too few vertices or a non-finite coordinate.
    #[error("invalid polygon: {reason}")]
    InvalidPolygon { reason: String },

    /// A position had a NaN or infinite coordinate.
    #[error("invalid point: ({lat}, {lng})")]
    InvalidPoint { lat: f64, lng: f64 },

    /// A position update arrived while no fence is set.
    #[error("no active fence")]
    NoActiveFence,

    /// A draft operation was called while the editor is idle.
    #[error("fence editor is not drawing")]
    NotDrawing,

    /// Simulator step size must be finite and non-negative.
    #[error("invalid simulator step size: {0}")]
    InvalidStep(f64),
}

impl GeofenceError {
    /// True for signals that mean "nothing happened" rather than a bad request.
    pub fn is_benign(&self) -> bool {
        matches!(self, GeofenceError::NoActiveFence)
    }
}
