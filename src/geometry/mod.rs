pub mod centroid;
pub mod containment;
pub mod projection;

pub use centroid::vertex_mean;
pub use containment::{evaluate, point_in_ring};
pub use projection::{Projector, degrees_to_meters};
