//! ffta-core: Record store for the FFTA game data tables
//!
//! This library provides:
//! - The fixed set of entities (races, jobs, abilities) and their backing files
//! - CSV loading and atomic write-back of whole tables
//! - Row-indexed create/read/update/delete over those tables
//! - The per-entity text filters applied to list requests

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod parser;
pub mod store;
pub mod table;
pub mod writer;

pub use config::StoreConfig;
pub use entity::Entity;
pub use error::{Error, Result};
pub use filter::{matching_rows, normalize, ListFilters};
pub use parser::{parse_csv, parse_csv_str};
pub use store::{parse_index, EntitySummary, TableStore};
pub use table::{CellValue, Column, Record, Row, Table};
pub use writer::write_csv;
