use rand::Rng;

use crate::domain::GeoPoint;
use crate::error::GeofenceError;

/// Default per-axis step in degrees (roughly 80-90 m)
pub const DEFAULT_STEP_DEGREES: f64 = 0.0008;

/// Random-walk position generator.
///
/// Each tick moves the point by an independent uniform offset in
/// `[-step, step]` on both axes. The random source is supplied by the caller,
/// so a seeded RNG reproduces the same trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSimulator {
    step: f64,
}

impl Default for MovementSimulator {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP_DEGREES,
        }
    }
}

impl MovementSimulator {
    pub fn new(step: f64) -> Result<Self, GeofenceError> {
        if !step.is_finite() || step < 0.0 {
            return Err(GeofenceError::InvalidStep(step));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Produce the next position from `current`
    pub fn tick<R: Rng>(
        &self,
        current: GeoPoint,
        rng: &mut R,
    ) -> Result<GeoPoint, GeofenceError> {
        let current = current.validate()?;
        let d_lat = rng.gen_range(-self.step..=self.step);
        let d_lng = rng.gen_range(-self.step..=self.step);
        Ok(GeoPoint::new(current.lat + d_lat, current.lng + d_lng))
    }
}
