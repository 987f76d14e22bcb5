//! Tabular record store
//!
//! Every operation is a full read (and, for mutations, a full rewrite) of
//! the entity's backing file; nothing is cached between calls. Rows are
//! addressed by their 0-based position in the file, so deleting row `n`
//! renumbers every row after it.
//!
//! Each entity has its own lock. Readers share it; a mutation holds it
//! exclusively across its whole read-modify-write cycle, so two writers in
//! the same process can never lose each other's changes.

use crate::config::StoreConfig;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::filter::{matching_rows, ListFilters};
use crate::parser::parse_csv;
use crate::table::{Record, Table};
use crate::writer::write_csv;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse a row index from a request path.
///
/// Any integer is a well-formed index; negative ones and ones too large
/// for a row position never name a row and are reported as not found.
pub fn parse_index(entity: Entity, raw: &str) -> Result<usize> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidIndex(raw.to_string()));
    }

    let not_found = || Error::RecordNotFound {
        entity,
        index: trimmed.to_string(),
    };
    let index: i64 = trimmed.parse().map_err(|_| not_found())?;
    usize::try_from(index).map_err(|_| not_found())
}

/// Summary of one entity's backing table
#[derive(Debug, Clone, Serialize)]
pub struct EntitySummary {
    pub entity: Entity,
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// CRUD access to the configured entity tables
pub struct TableStore {
    config: StoreConfig,
    locks: HashMap<Entity, RwLock<()>>,
}

impl TableStore {
    /// Create a store over the given entity-to-file mapping
    pub fn new(config: StoreConfig) -> Self {
        let locks = config.entities().map(|e| (e, RwLock::new(()))).collect();
        Self { config, locks }
    }

    fn lock(&self, entity: Entity) -> Result<&RwLock<()>> {
        self.locks
            .get(&entity)
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    fn load(&self, entity: Entity) -> Result<(Table, &Path)> {
        let path = self.config.path(entity)?;
        Ok((parse_csv(path)?, path))
    }

    fn check_index(entity: Entity, table: &Table, index: usize) -> Result<()> {
        if index >= table.row_count() {
            return Err(Error::RecordNotFound {
                entity,
                index: index.to_string(),
            });
        }
        Ok(())
    }

    /// All rows of `entity` that pass `filters`, in file order
    pub fn list_records(&self, entity: Entity, filters: &ListFilters) -> Result<Vec<Record>> {
        let _guard = self.lock(entity)?.read();
        let (table, _) = self.load(entity)?;

        let rows = matching_rows(entity, &table, filters)?;
        debug!(%entity, total = table.row_count(), matched = rows.len(), "listed records");
        Ok(rows
            .into_iter()
            .map(|i| table.to_record(&table.rows[i]))
            .collect())
    }

    /// The row at `index`
    pub fn get_record(&self, entity: Entity, index: usize) -> Result<Record> {
        let _guard = self.lock(entity)?.read();
        let (table, _) = self.load(entity)?;

        Self::check_index(entity, &table, index)?;
        Ok(table.to_record(&table.rows[index]))
    }

    /// Append `record` as the last row, adding any columns it introduces
    pub fn append_record(&self, entity: Entity, record: Record) -> Result<()> {
        let _guard = self.lock(entity)?.write();
        let (mut table, path) = self.load(entity)?;

        table.push_record(&record);
        write_csv(&table, path)?;
        info!(%entity, index = table.row_count() - 1, "record appended");
        Ok(())
    }

    /// Overwrite the fields present in `partial` on the row at `index`
    pub fn update_record(&self, entity: Entity, index: usize, partial: Record) -> Result<()> {
        let _guard = self.lock(entity)?.write();
        let (mut table, path) = self.load(entity)?;

        Self::check_index(entity, &table, index)?;
        table.update_row(index, &partial);
        write_csv(&table, path)?;
        info!(%entity, index, fields = partial.len(), "record updated");
        Ok(())
    }

    /// Remove the row at `index`; later rows move up by one
    pub fn delete_record(&self, entity: Entity, index: usize) -> Result<()> {
        let _guard = self.lock(entity)?.write();
        let (mut table, path) = self.load(entity)?;

        Self::check_index(entity, &table, index)?;
        table.remove_row(index);
        write_csv(&table, path)?;
        info!(%entity, index, remaining = table.row_count(), "record deleted");
        Ok(())
    }

    /// Row and column counts for every configured entity
    pub fn summaries(&self) -> Result<Vec<EntitySummary>> {
        self.config
            .entities()
            .map(|entity| -> Result<EntitySummary> {
                let _guard = self.lock(entity)?.read();
                let (table, path) = self.load(entity)?;
                Ok(EntitySummary {
                    entity,
                    path: path.to_path_buf(),
                    columns: table.columns.iter().map(|c| c.name.clone()).collect(),
                    rows: table.row_count(),
                })
            })
            .collect()
    }
}
