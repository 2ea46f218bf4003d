pub mod entity;
pub mod point;
pub mod polygon;

pub use entity::TrackedEntity;
pub use point::GeoPoint;
pub use polygon::{BoundingBox, MIN_VERTICES, Polygon};
