//! Comma-delimited loader producing an identifier-keyed [`Table`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SieveError};
use crate::table::{Row, Table, Value};

/// Columns parsed as numbers unless configured otherwise.
pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &["price", "longitude", "latitude"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Name of the unique row identifier column.
    pub id_column: String,
    /// Columns declared numeric; every other column stays text.
    pub numeric_columns: Vec<String>,
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            numeric_columns: DEFAULT_NUMERIC_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl LoaderConfig {
    /// Set the identifier column.
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    /// Replace the declared numeric columns.
    pub fn with_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Reads delimited files into tables.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a file from disk.
    ///
    /// Fails with [`SieveError::MalformedInput`] when the file cannot be
    /// read, a record is ragged, or the identifier column is missing,
    /// null, or duplicated.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let contents = fs::read(path)
            .map_err(|e| SieveError::malformed(path, format!("unreadable file: {}", e)))?;

        let table = self.parse_bytes(&contents, path)?;
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse bytes directly. `origin` is only used in error messages.
    pub fn parse_bytes(&self, bytes: &[u8], origin: &Path) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SieveError::malformed(origin, e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let numeric: Vec<bool> = headers
            .iter()
            .map(|h| h != &self.config.id_column && self.config.numeric_columns.contains(h))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| SieveError::malformed(origin, e.to_string()))?;
            let values = record
                .iter()
                .zip(&numeric)
                .map(|(raw, &is_numeric)| parse_value(raw, is_numeric))
                .collect();
            rows.push(Row::new(values));
        }

        Table::new(headers, &self.config.id_column, rows)
            .map_err(|e| SieveError::malformed(origin, e.to_string()))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw field represents a missing value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
}

fn parse_value(raw: &str, numeric: bool) -> Value {
    if is_null_token(raw) {
        return Value::Null;
    }
    if numeric {
        if let Ok(n) = raw.trim().parse::<f64>() {
            return Value::Number(n);
        }
    }
    Value::Text(raw.to_string())
}
