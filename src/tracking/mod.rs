pub mod session;
pub mod simulator;
pub mod ticker;

pub use session::{FenceEvent, GeofenceSession, PositionUpdate, Status};
pub use simulator::{DEFAULT_STEP_DEGREES, MovementSimulator};
pub use ticker::{CancelToken, TrackingLoop, TrackingSummary};
