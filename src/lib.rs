//! geofence - Draw polygon fences and track a moving point against them

pub mod config;
pub mod domain;
pub mod error;
pub mod fence;
pub mod geometry;
pub mod store;
pub mod tracking;

pub use domain::{GeoPoint, Polygon, TrackedEntity};
pub use error::GeofenceError;
pub use fence::FenceEditor;
pub use geometry::evaluate;
pub use tracking::{FenceEvent, GeofenceSession, MovementSimulator, PositionUpdate, Status};
