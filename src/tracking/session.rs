use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::{GeoPoint, Polygon};
use crate::error::GeofenceError;
use crate::geometry::evaluate;

/// Derived fence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No fence is set
    Unset,
    /// A fence is set but no position has been evaluated
    Ready,
    Inside,
    Outside,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Unset => "no fence",
            Status::Ready => "fence ready",
            Status::Inside => "inside",
            Status::Outside => "outside",
        };
        f.write_str(label)
    }
}

/// Emitted when the tracked position crosses the fence boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FenceEvent {
    /// Moved from inside to outside
    Breach {
        timestamp: DateTime<Utc>,
        point: GeoPoint,
    },
    /// Moved from outside back inside
    Recovery {
        timestamp: DateTime<Utc>,
        point: GeoPoint,
    },
}

impl FenceEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FenceEvent::Breach { timestamp, .. } | FenceEvent::Recovery { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn point(&self) -> GeoPoint {
        match self {
            FenceEvent::Breach { point, .. } | FenceEvent::Recovery { point, .. } => *point,
        }
    }

    pub fn is_breach(&self) -> bool {
        matches!(self, FenceEvent::Breach { .. })
    }
}

impl fmt::Display for FenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenceEvent::Breach { timestamp, point } => write!(
                f,
                "Breach detected at {}. Location: {}",
                timestamp.format("%H:%M:%S"),
                point
            ),
            FenceEvent::Recovery { timestamp, point } => write!(
                f,
                "Returned inside the geofence at {}. Location: {}",
                timestamp.format("%H:%M:%S"),
                point
            ),
        }
    }
}

/// Result of a position update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionUpdate {
    pub position: GeoPoint,
    pub status: Status,
    pub event: Option<FenceEvent>,
}

/// Live fence state for a single tracked entity.
///
/// Holds the active fence, the last evaluated position and whether that
/// position was inside. Every method takes `&mut self`, so updates on one
/// session are applied strictly one after another. Sessions share nothing;
/// track several entities by creating several sessions.
#[derive(Debug, Clone, Default)]
pub struct GeofenceSession {
    fence: Option<Polygon>,
    position: Option<GeoPoint>,
    last_inside: Option<bool>,
    tracking: bool,
}

impl GeofenceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        match (&self.fence, self.last_inside) {
            (None, _) => Status::Unset,
            (Some(_), None) => Status::Ready,
            (Some(_), Some(true)) => Status::Inside,
            (Some(_), Some(false)) => Status::Outside,
        }
    }

    pub fn fence(&self) -> Option<&Polygon> {
        self.fence.as_ref()
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Install a fence, forgetting any earlier position history
    pub fn set_fence(&mut self, polygon: Polygon) -> Status {
        log::info!("Fence set with {} vertices", polygon.len());
        self.fence = Some(polygon);
        self.position = None;
        self.last_inside = None;
        self.status()
    }

    /// Validate raw vertices and install them as the fence
    ///
    /// The session is left untouched if the vertices do not form a polygon.
    pub fn load_fence(&mut self, vertices: &[GeoPoint]) -> Result<Status, GeofenceError> {
        let polygon = Polygon::new(vertices.to_vec())?;
        Ok(self.set_fence(polygon))
    }

    /// Drop the fence and all tracking state
    pub fn clear_fence(&mut self) {
        if self.tracking {
            log::info!("Tracking halted: fence cleared");
        }
        self.fence = None;
        self.position = None;
        self.last_inside = None;
        self.tracking = false;
    }

    /// Evaluate a new position, stamping any event with the current time
    pub fn update_position(&mut self, point: GeoPoint) -> Result<PositionUpdate, GeofenceError> {
        self.update_position_at(point, Utc::now())
    }

    /// Evaluate a new position against the fence
    ///
    /// Returns `NoActiveFence` without changing anything when no fence is
    /// set. Otherwise emits at most one event: `Breach` on an inside to
    /// outside transition and `Recovery` on the reverse. The first update
    /// after a fence is set never emits.
    pub fn update_position_at(
        &mut self,
        point: GeoPoint,
        timestamp: DateTime<Utc>,
    ) -> Result<PositionUpdate, GeofenceError> {
        let point = point.validate()?;
        let fence = self.fence.as_ref().ok_or(GeofenceError::NoActiveFence)?;

        let inside = evaluate(point, fence);
        log::debug!(
            "Position {} is {}",
            point,
            if inside { "inside" } else { "outside" }
        );

        let event = match (self.last_inside, inside) {
            (Some(true), false) => {
                log::warn!("Fence breach at {}", point);
                Some(FenceEvent::Breach { timestamp, point })
            }
            (Some(false), true) => {
                log::info!("Returned inside fence at {}", point);
                Some(FenceEvent::Recovery { timestamp, point })
            }
            _ => None,
        };

        self.last_inside = Some(inside);
        self.position = Some(point);

        Ok(PositionUpdate {
            position: point,
            status: self.status(),
            event,
        })
    }

    /// Begin tracking from the fence centroid
    ///
    /// The starting position is assumed to be inside, so a centroid that
    /// falls outside a concave fence reports a breach immediately.
    pub fn start_tracking(&mut self) -> Result<PositionUpdate, GeofenceError> {
        let start = self
            .fence
            .as_ref()
            .ok_or(GeofenceError::NoActiveFence)?
            .centroid()
            .validate()?;

        self.last_inside = Some(true);
        self.tracking = true;
        log::info!("Tracking started at {}", start);
        self.update_position(start)
    }

    /// Stop tracking and return to `Ready` (or `Unset` without a fence)
    pub fn stop_tracking(&mut self) -> Status {
        if self.tracking {
            log::info!("Tracking stopped");
        }
        self.tracking = false;
        self.position = None;
        self.last_inside = None;
        self.status()
    }
}
