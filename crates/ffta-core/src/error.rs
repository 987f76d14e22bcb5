//! Error types for ffta-core

use crate::entity::Entity;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ffta-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a backing file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a backing file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV was readable but structurally unusable
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Entity name is not one of the configured tables
    #[error("entity '{0}' not found")]
    EntityNotFound(String),

    /// Row index is outside the table
    #[error("record {index} not found in {entity}")]
    RecordNotFound { entity: Entity, index: String },

    /// Row index is not an integer
    #[error("invalid record index '{0}'")]
    InvalidIndex(String),

    /// Request body could not be turned into a record
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// A filter needs a column the table does not have
    #[error("column '{column}' required by the {entity} filter is missing")]
    MissingColumn { entity: Entity, column: String },
}

impl Error {
    /// Returns true for unknown entities and out-of-range records.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntityNotFound(_) | Error::RecordNotFound { .. })
    }

    /// Returns true if the caller, not the storage layer, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.is_not_found() || matches!(self, Error::InvalidIndex(_) | Error::InvalidRecord(_))
    }
}
