use crate::domain::GeoPoint;

/// Equirectangular projection from lat/lng degrees to local meters
///
/// Uses approximation suitable for fence-sized areas:
/// - x = (lng - center_lng) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Used only for human-readable distances; membership tests stay in degrees.
#[derive(Debug, Clone)]
pub struct Projector {
    center: GeoPoint,
    cos_lat: f64,
}

/// Meters per degree at equator
const METERS_PER_DEGREE: f64 = 111320.0;

impl Projector {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            cos_lat: center.lat.to_radians().cos(),
        }
    }

    /// Project a point to (x, y) meters relative to the center
    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        let x = (point.lng - self.center.lng) * self.cos_lat * METERS_PER_DEGREE;
        let y = (point.lat - self.center.lat) * METERS_PER_DEGREE;
        (x, y)
    }

    /// Approximate distance in meters between two nearby points
    pub fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let (ax, ay) = self.project(a);
        let (bx, by) = self.project(b);
        ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
    }
}

/// Convert a latitude step in degrees to meters
pub fn degrees_to_meters(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_center() {
        let center = GeoPoint::new(40.7128, -74.006);
        let proj = Projector::new(center);
        let (x, y) = proj.project(center);
        assert!(x.abs() < 0.01);
        assert!(y.abs() < 0.01);
    }

    #[test]
    fn test_default_step_in_meters() {
        let meters = degrees_to_meters(0.0008);
        assert!((meters - 89.0).abs() < 1.0);
    }

    #[test]
    fn test_distance_1km() {
        let proj = Projector::new(GeoPoint::new(40.7128, -74.006));
        // 0.009 degrees latitude is roughly 1 km
        let d = proj.distance(
            GeoPoint::new(40.7128, -74.006),
            GeoPoint::new(40.7128 + 0.009, -74.006),
        );
        assert!((d - 1000.0).abs() < 50.0);
    }
}
