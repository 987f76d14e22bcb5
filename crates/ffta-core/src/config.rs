//! Store configuration: which file backs which entity

use crate::entity::Entity;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Immutable entity-to-file mapping handed to the store at construction
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    paths: BTreeMap<Entity, PathBuf>,
}

impl StoreConfig {
    /// Create a configuration with no entities bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every entity to `<dir>/<entity>.csv`
    pub fn from_data_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Entity::ALL.into_iter().fold(Self::new(), |config, entity| {
            config.with_entity(entity, dir.join(format!("{}.csv", entity.as_str())))
        })
    }

    /// Bind an entity to a backing file
    pub fn with_entity(mut self, entity: Entity, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(entity, path.into());
        self
    }

    /// Backing file for an entity
    pub fn path(&self, entity: Entity) -> Result<&Path> {
        self.paths
            .get(&entity)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    /// Entities that have a backing file, in listing order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.paths.keys().copied()
    }
}
