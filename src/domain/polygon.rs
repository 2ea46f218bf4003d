use geo::{BoundingRect, LineString};
use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::error::GeofenceError;
use crate::geometry::{point_in_ring, vertex_mean};

/// Minimum number of vertices for a closed fence
pub const MIN_VERTICES: usize = 3;

/// A closed fence boundary.
///
/// Vertices are kept in the order they were recorded; consecutive vertices
/// form edges and the last vertex connects back to the first. A `Polygon`
/// always has at least three finite vertices and cannot be modified after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<GeoPoint>) -> Result<Self, GeofenceError> {
        if vertices.len() < MIN_VERTICES {
            return Err(GeofenceError::InvalidPolygon {
                reason: format!(
                    "{} vertices, at least {} required",
                    vertices.len(),
                    MIN_VERTICES
                ),
            });
        }

        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeofenceError::InvalidPolygon {
                reason: format!("vertex {} has a non-finite coordinate", i),
            });
        }

        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Even-odd membership test, see [`crate::geometry::evaluate`]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point_in_ring(point, &self.vertices)
    }

    /// Arithmetic mean of the vertices (not area-weighted)
    pub fn centroid(&self) -> GeoPoint {
        // Non-empty by construction
        vertex_mean(&self.vertices).unwrap_or(self.vertices[0])
    }

    /// Convert to a `geo` polygon with x = lng and y = lat
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: LineString<f64> = self
            .vertices
            .iter()
            .map(|p| geo::coord! { x: p.lng, y: p.lat })
            .collect();
        geo::Polygon::new(exterior, vec![])
    }

    /// Smallest lat/lng box enclosing every vertex
    pub fn bounds(&self) -> BoundingBox {
        match self.to_geo().bounding_rect() {
            Some(rect) => BoundingBox {
                south: rect.min().y,
                west: rect.min().x,
                north: rect.max().y,
                east: rect.max().x,
            },
            None => {
                let p = self.vertices[0];
                BoundingBox {
                    south: p.lat,
                    west: p.lng,
                    north: p.lat,
                    east: p.lng,
                }
            }
        }
    }
}

impl TryFrom<Vec<GeoPoint>> for Polygon {
    type Error = GeofenceError;

    fn try_from(vertices: Vec<GeoPoint>) -> Result<Self, Self::Error> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<GeoPoint> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Lat/lng bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}
