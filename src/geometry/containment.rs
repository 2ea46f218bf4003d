use crate::domain::{GeoPoint, MIN_VERTICES, Polygon};

/// Test whether `point` lies inside `polygon` using the even-odd rule
///
/// # Algorithm
/// Casts a ray from the point and counts how many polygon edges it crosses;
/// an odd count means inside. `lat` is used as x and `lng` as y. Horizontal
/// edges never straddle the ray and are skipped without dividing by zero.
///
/// Self-intersecting polygons are not repaired: membership follows even-odd
/// parity literally, so a region covered twice (the core of a pentagram)
/// counts as outside. Points exactly on the boundary may land on either side,
/// but the same input always gives the same answer.
pub fn evaluate(point: GeoPoint, polygon: &Polygon) -> bool {
    point_in_ring(point, polygon.vertices())
}

/// Even-odd test over a raw vertex slice.
///
/// Returns `false` for fewer than three vertices.
pub fn point_in_ring(point: GeoPoint, vertices: &[GeoPoint]) -> bool {
    let n = vertices.len();
    if n < MIN_VERTICES {
        return false;
    }

    let x = point.lat;
    let y = point.lng;
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].lat, vertices[i].lng);
        let (xj, yj) = (vertices[j].lat, vertices[j].lng);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_square_membership() {
        let fence = square();
        assert!(evaluate(GeoPoint::new(5.0, 5.0), &fence));
        assert!(!evaluate(GeoPoint::new(15.0, 5.0), &fence));
        assert!(!evaluate(GeoPoint::new(-1.0, -1.0), &fence));
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let fence = square();
        // On the boundary the answer is float-dependent but must not change
        for p in [
            GeoPoint::new(0.0, 5.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(5.0, 0.0),
        ] {
            let first = evaluate(p, &fence);
            for _ in 0..10 {
                assert_eq!(evaluate(p, &fence), first);
            }
        }
    }

    #[test]
    fn test_short_rings_are_outside() {
        let p = GeoPoint::new(0.5, 0.5);
        assert!(!point_in_ring(p, &[]));
        assert!(!point_in_ring(p, &[GeoPoint::new(0.0, 0.0)]));
        assert!(!point_in_ring(
            p,
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]
        ));
    }

    #[test]
    fn test_horizontal_edges() {
        // Edges with equal lng on both ends must not divide by zero
        let fence = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(4.0, 0.0),
            GeoPoint::new(4.0, 4.0),
            GeoPoint::new(0.0, 4.0),
        ])
        .unwrap();
        assert!(evaluate(GeoPoint::new(2.0, 2.0), &fence));
        assert!(!evaluate(GeoPoint::new(2.0, 0.0 - 1e-9), &fence));
    }

    #[test]
    fn test_concave_notch() {
        // U shape open towards high lat
        let fence = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 9.0),
            GeoPoint::new(9.0, 9.0),
            GeoPoint::new(9.0, 6.0),
            GeoPoint::new(3.0, 6.0),
            GeoPoint::new(3.0, 3.0),
            GeoPoint::new(9.0, 3.0),
            GeoPoint::new(9.0, 0.0),
        ])
        .unwrap();
        assert!(evaluate(GeoPoint::new(1.5, 4.5), &fence));
        assert!(!evaluate(GeoPoint::new(6.0, 4.5), &fence));
        assert!(evaluate(GeoPoint::new(6.0, 1.5), &fence));
    }

    #[test]
    fn test_pentagram_core_is_outside() {
        // Star drawn through every second pentagon corner; the center is
        // wound twice so even-odd parity puts it outside
        let star = Polygon::new(vec![
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(-5.8779, -8.0902),
            GeoPoint::new(9.5106, 3.0902),
            GeoPoint::new(-9.5106, 3.0902),
            GeoPoint::new(5.8779, -8.0902),
        ])
        .unwrap();
        assert!(!evaluate(GeoPoint::new(0.1, 0.2), &star));
        assert!(evaluate(GeoPoint::new(0.1, 8.0), &star));
        assert!(!evaluate(GeoPoint::new(0.1, 12.0), &star));
    }

    #[test]
    fn test_self_intersecting_follows_even_odd() {
        // Bow tie: two lobes meeting at (5, 5)
        let bow = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
            GeoPoint::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(evaluate(GeoPoint::new(8.0, 5.0), &bow));
        assert!(evaluate(GeoPoint::new(2.0, 5.0), &bow));
        assert!(!evaluate(GeoPoint::new(5.0, 2.0), &bow));
    }
}
