//! Write tables back to their backing files
//!
//! The whole table is serialized into a temporary file next to the target
//! and then renamed over it, so a concurrent reader sees either the old or
//! the new contents, never a partial file.

use crate::error::{Error, Result};
use crate::table::Table;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace the file at `path` with the contents of `table`
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

    {
        let mut writer = csv::Writer::from_writer(BufWriter::new(tmp.as_file_mut()));
        let csv_err = |source: csv::Error| Error::Csv {
            path: path.to_path_buf(),
            source,
        };

        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .map_err(csv_err)?;
        for row in &table.rows {
            writer
                .write_record((0..table.column_count()).map(|i| row.field(i)))
                .map_err(csv_err)?;
        }

        let mut inner = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;
        inner.flush().map_err(write_err)?;
    }

    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_csv, parse_csv_str};
    use crate::table::{CellValue, Record};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_quotes_special_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abilities.csv");

        let mut table = parse_csv_str("name,description\n", "abilities.csv").unwrap();
        table.push_record(
            &Record::new()
                .with("name", CellValue::String("Aim: Legs".to_string()))
                .with(
                    "description",
                    CellValue::String("Immobilize, then \"strike\"".to_string()),
                ),
        );
        write_csv(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "name,description\nAim: Legs,\"Immobilize, then \"\"strike\"\"\"\n"
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("races.csv");
        fs::write(&path, "name\nHuman\nViera\nMoogle\n").unwrap();

        let mut table = parse_csv(&path).unwrap();
        table.remove_row(1);
        write_csv(&table, &path).unwrap();

        let reread = parse_csv(&path).unwrap();
        assert_eq!(reread.row_count(), 2);
        assert_eq!(
            reread.rows[1].cells[0],
            CellValue::String("Moogle".to_string())
        );
        // no stray temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let table = parse_csv_str("name\n", "races.csv").unwrap();
        let err = write_csv(&table, "/nonexistent/dir/races.csv").unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }
}
