//! Core table types for representing spreadsheet data

use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::PathBuf;

/// Canonical form of a column name: trimmed and lowercased.
///
/// Applied both when reading headers and when accepting record keys, so a
/// table never accumulates `Name` and `name` side by side.
pub fn canonical_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A table loaded from a single backing file
#[derive(Debug, Clone)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data, each padded to the column count
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by its canonical name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Return the index of `name`, appending it as a blank column if absent
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(col) = self.find_column(name) {
            return col.index;
        }

        let index = self.columns.len();
        self.columns.push(Column::new(name.to_string(), index));
        for row in &mut self.rows {
            row.resize(index + 1);
        }
        index
    }

    /// The row at `index` as a record
    pub fn record(&self, index: usize) -> Option<Record> {
        self.rows.get(index).map(|row| self.to_record(row))
    }

    pub(crate) fn to_record(&self, row: &Row) -> Record {
        let fields = self
            .columns
            .iter()
            .map(|col| {
                let value = row.get(col.index).cloned().unwrap_or(CellValue::Empty);
                (col.name.clone(), value)
            })
            .collect();
        Record { fields }
    }

    /// Append a record as a new row, widening the table for unseen columns
    pub fn push_record(&mut self, record: &Record) {
        for (name, _) in record.iter() {
            self.ensure_column(name);
        }

        let mut cells = vec![CellValue::Empty; self.columns.len()];
        for (name, value) in record.iter() {
            if let Some(col) = self.find_column(name) {
                cells[col.index] = value.clone();
            }
        }
        self.rows.push(Row::new(cells));
    }

    /// Overwrite the fields present in `partial` on row `index`.
    ///
    /// Returns false if the row does not exist.
    pub fn update_row(&mut self, index: usize, partial: &Record) -> bool {
        if index >= self.rows.len() {
            return false;
        }

        for (name, value) in partial.iter() {
            let col = self.ensure_column(name);
            self.rows[index].set(col, value.clone());
        }
        true
    }

    /// Remove row `index`, shifting later rows down by one
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }
}

/// A column definition
#[derive(Debug, Clone)]
pub struct Column {
    /// Canonical (lowercase) column name
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values for each column
    pub(crate) cells: Vec<CellValue>,
    /// Text each cell was read from; `None` once the cell has been set
    source: Vec<Option<String>>,
}

impl Row {
    /// Create a new row from values that have no file representation yet
    pub fn new(cells: Vec<CellValue>) -> Self {
        let source = vec![None; cells.len()];
        Self { cells, source }
    }

    /// Create a row from the raw fields of a CSV record
    pub fn from_fields(fields: Vec<String>) -> Self {
        let cells = fields.iter().map(|f| CellValue::parse(f)).collect();
        let source = fields.into_iter().map(Some).collect();
        Self { cells, source }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// All cell values, in column order
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Replace a cell, dropping the text it was read from
    pub fn set(&mut self, index: usize, value: CellValue) {
        self.cells[index] = value;
        self.source[index] = None;
    }

    /// Pad with blank cells or truncate to `len` columns
    pub fn resize(&mut self, len: usize) {
        self.cells.resize(len, CellValue::Empty);
        self.source.resize(len, None);
    }

    /// Text to write for cell `index`: the original field when untouched,
    /// so values like `007` or `3.0` survive a rewrite of the table
    pub fn field(&self, index: usize) -> String {
        match self.source.get(index) {
            Some(Some(raw)) => raw.clone(),
            _ => self
                .cells
                .get(index)
                .map(CellValue::to_string_value)
                .unwrap_or_default(),
        }
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // "nan" and "inf" parse as f64 but are names, not numbers
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        CellValue::String(trimmed.to_string())
    }

    /// Convert a JSON scalar from a request body into a cell
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::String(b.to_string()),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => CellValue::Integer(i),
                (None, Some(f)) => CellValue::Float(f),
                (None, None) => CellValue::parse(&n.to_string()),
            },
            Value::String(s) => CellValue::parse(s),
            Value::Array(_) | Value::Object(_) => CellValue::String(value.to_string()),
        }
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            // Debug keeps the fraction, so 3.0 reads back as a float
            CellValue::Float(f) => format!("{:?}", f),
            CellValue::String(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Empty => serializer.serialize_none(),
        }
    }
}

/// One row exposed as an ordered column-name to value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a request body, which must be a JSON object
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidRecord(
                "request body must be a JSON object".to_string(),
            ));
        };

        let mut record = Record::new();
        for (key, value) in &map {
            if key.trim().is_empty() {
                return Err(Error::InvalidRecord("column names must not be blank".to_string()));
            }
            record.insert(key, CellValue::from_json(value));
        }
        Ok(record)
    }

    /// Set a field, canonicalizing the column name; replaces an existing field
    pub fn insert(&mut self, column: &str, value: CellValue) {
        let column = canonical_column(column);
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style [`Record::insert`]
    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Get a field by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
