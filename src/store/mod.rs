//! Storage for tracked entities and their fences.
//!
//! The geofence engine never touches storage itself: callers load a fence
//! from an entity, hand it to a session, and write new fences back here.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::domain::TrackedEntity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("route id {route} does not match entity id {entity}")]
    IdMismatch { route: String, entity: String },

    #[error("entity name is required")]
    MissingName,

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Basic CRUD over tracked entities keyed by id
pub trait EntityStore {
    fn list(&self) -> Result<Vec<TrackedEntity>, StoreError>;

    fn get(&self, id: &str) -> Result<TrackedEntity, StoreError>;

    /// Insert a new entity under a freshly generated id, returning the stored copy
    fn create(&mut self, entity: TrackedEntity) -> Result<TrackedEntity, StoreError>;

    /// Replace the entity stored under `id`
    fn update(&mut self, id: &str, entity: TrackedEntity) -> Result<(), StoreError>;

    /// Remove an entity; removing a missing id is not an error
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Assign a new id to an entity about to be created
pub(crate) fn prepare_create(mut entity: TrackedEntity) -> Result<TrackedEntity, StoreError> {
    if entity.name.trim().is_empty() {
        return Err(StoreError::MissingName);
    }
    entity.name = entity.name.trim().to_string();
    entity.id = Some(uuid::Uuid::new_v4().to_string());
    Ok(entity)
}

/// Check that an update targets the entity it carries
pub(crate) fn prepare_update(
    id: &str,
    mut entity: TrackedEntity,
) -> Result<TrackedEntity, StoreError> {
    match entity.id.as_deref() {
        Some(entity_id) if entity_id != id => {
            return Err(StoreError::IdMismatch {
                route: id.to_string(),
                entity: entity_id.to_string(),
            });
        }
        _ => {}
    }
    if entity.name.trim().is_empty() {
        return Err(StoreError::MissingName);
    }
    entity.id = Some(id.to_string());
    Ok(entity)
}
