use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{EntityStore, MemoryStore, StoreError};
use crate::domain::TrackedEntity;

/// Entity store persisted as a JSON array in a single file
///
/// The whole file is read on open and rewritten after every change. There is
/// no locking: one process should own the file at a time.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is treated as empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                MemoryStore::new()
            } else {
                let entities: Vec<TrackedEntity> = serde_json::from_str(&contents)?;
                MemoryStore::from_entities(entities)
            }
        } else {
            MemoryStore::new()
        };

        log::debug!(
            "Opened entity store {} ({} entities)",
            path.display(),
            inner.len()
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy, persist it, and only then keep it
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.inner.clone();
        let out = change(&mut next)?;
        write_entities(&self.path, &next)?;
        self.inner = next;
        Ok(out)
    }
}

fn write_entities(path: &Path, store: &MemoryStore) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &store.list()?)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

impl EntityStore for JsonFileStore {
    fn list(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        self.inner.list()
    }

    fn get(&self, id: &str) -> Result<TrackedEntity, StoreError> {
        self.inner.get(id)
    }

    fn create(&mut self, entity: TrackedEntity) -> Result<TrackedEntity, StoreError> {
        self.commit(|store| store.create(entity))
    }

    fn update(&mut self, id: &str, entity: TrackedEntity) -> Result<(), StoreError> {
        self.commit(|store| store.update(id, entity))
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.commit(|store| store.delete(id))
    }
}
