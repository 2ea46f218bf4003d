use serde::{Deserialize, Serialize};

use super::{GeoPoint, Polygon};
use crate::error::GeofenceError;

/// A stored record for something being tracked, optionally carrying its fence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Raw fence vertices as stored; validated by [`TrackedEntity::fence`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fence_coordinates: Option<Vec<GeoPoint>>,
}

impl TrackedEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_fence(&self) -> bool {
        self.fence_coordinates
            .as_ref()
            .is_some_and(|coords| !coords.is_empty())
    }

    /// The stored fence as a validated polygon, if one is present
    pub fn fence(&self) -> Result<Option<Polygon>, GeofenceError> {
        match &self.fence_coordinates {
            Some(coords) if !coords.is_empty() => Polygon::new(coords.clone()).map(Some),
            _ => Ok(None),
        }
    }

    pub fn set_fence(&mut self, polygon: Option<&Polygon>) {
        self.fence_coordinates = polygon.map(|p| p.vertices().to_vec());
    }

    pub fn with_fence(mut self, polygon: &Polygon) -> Self {
        self.set_fence(Some(polygon));
        self
    }
}
