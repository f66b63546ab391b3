//! Serialises a [`Table`] back to comma-delimited text.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Result, SieveError};
use crate::table::Table;

/// Write a table to `writer` with a header row.
///
/// Nulls become empty fields, numbers use the shortest round-trip form and
/// timestamps the canonical layout, so the bytes depend only on the table.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .from_writer(writer);

    out.write_record(table.headers())?;
    for row in table.rows() {
        out.write_record(row.values().iter().map(|v| v.to_string()))?;
    }
    out.flush().map_err(|e| SieveError::Csv(e.into()))?;
    Ok(())
}

/// Write a table to a file, creating parent directories as needed.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SieveError::io(parent, e))?;
        }
    }

    let file = File::create(path).map_err(|e| SieveError::io(path, e))?;
    write_table(table, file)
}
