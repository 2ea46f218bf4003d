use crate::domain::GeoPoint;

/// Arithmetic mean of a set of points.
///
/// This is the plain vertex average, not the area-weighted centroid, so it
/// can fall outside a concave fence. Returns `None` for an empty slice.
pub fn vertex_mean(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }

    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    let n = points.len() as f64;

    Some(GeoPoint::new(lat_sum / n, lng_sum / n))
}
