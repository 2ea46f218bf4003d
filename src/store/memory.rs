use std::collections::BTreeMap;

use super::{EntityStore, StoreError, prepare_create, prepare_update};
use crate::domain::TrackedEntity;

/// Entity store kept in memory, listed in id order
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: BTreeMap<String, TrackedEntity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded entities
    ///
    /// Records without an id are given a fresh one so they are kept.
    pub fn from_entities(entities: impl IntoIterator<Item = TrackedEntity>) -> Self {
        let entities = entities
            .into_iter()
            .map(|mut e| {
                let id = match e.id.as_deref() {
                    Some(id) if !id.is_empty() => id.to_string(),
                    _ => {
                        let id = uuid::Uuid::new_v4().to_string();
                        log::warn!("Entity {:?} had no id, assigned {}", e.name, id);
                        e.id = Some(id.clone());
                        id
                    }
                };
                (id, e)
            })
            .collect();
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for MemoryStore {
    fn list(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        Ok(self.entities.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<TrackedEntity, StoreError> {
        self.entities
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&mut self, entity: TrackedEntity) -> Result<TrackedEntity, StoreError> {
        let entity = prepare_create(entity)?;
        if let Some(id) = entity.id.clone() {
            self.entities.insert(id, entity.clone());
        }
        Ok(entity)
    }

    fn update(&mut self, id: &str, entity: TrackedEntity) -> Result<(), StoreError> {
        let entity = prepare_update(id, entity)?;
        self.entities.insert(id.to_string(), entity);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.entities.remove(id);
        Ok(())
    }
}
