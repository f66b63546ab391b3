//! In-memory table keyed by a unique row identifier.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexSet;
use thiserror::Error;

/// Canonical text layout for timestamps written back to disk.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Numeric view of the cell, if it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(CANONICAL_TIMESTAMP_FORMAT)),
        }
    }
}

/// One row of a [`Table`], values in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at a column position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Structural problems detected while building a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("identifier column '{0}' is missing")]
    MissingIdentifier(String),

    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),

    #[error("row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has a null identifier")]
    NullIdentifier { row: usize },

    #[error("identifier '{id}' is duplicated (row {row})")]
    DuplicateIdentifier { id: String, row: usize },
}

/// Ordered rows sharing one header, with a unique identifier column.
///
/// Identifier values are checked once at construction; the row-level
/// operations below only drop rows or rewrite non-identifier columns, so
/// uniqueness holds for every table derived from a valid one.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: IndexSet<String>,
    id_index: usize,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, validating the header and the identifier column.
    pub fn new(
        headers: Vec<String>,
        id_column: &str,
        rows: Vec<Row>,
    ) -> std::result::Result<Self, TableError> {
        let mut header_set = IndexSet::with_capacity(headers.len());
        for header in headers {
            if header_set.contains(&header) {
                return Err(TableError::DuplicateColumn(header));
            }
            header_set.insert(header);
        }

        let id_index = header_set
            .get_index_of(id_column)
            .ok_or_else(|| TableError::MissingIdentifier(id_column.to_string()))?;

        let mut seen = HashSet::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            if row.values.len() != header_set.len() {
                return Err(TableError::RowWidth {
                    row: row_idx,
                    expected: header_set.len(),
                    found: row.values.len(),
                });
            }

            let id = &row.values[id_index];
            if id.is_null() {
                return Err(TableError::NullIdentifier { row: row_idx });
            }
            if !seen.insert(id.to_string()) {
                return Err(TableError::DuplicateIdentifier {
                    id: id.to_string(),
                    row: row_idx,
                });
            }
        }

        Ok(Self {
            headers: header_set,
            id_index,
            rows,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    /// Name of the identifier column.
    pub fn id_column(&self) -> &str {
        self.headers
            .get_index(self.id_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.get_index_of(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Identifier of every row, in order.
    pub fn ids(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| row.values[self.id_index].to_string())
    }

    /// Look up a cell by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Keep only the rows matching `keep`, preserving their order.
    pub fn retain_rows(mut self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Rewrite every value of one non-identifier column.
    ///
    /// Returns the table unchanged when `index` is the identifier column or
    /// out of range.
    pub fn map_column(mut self, index: usize, mut f: impl FnMut(Value) -> Value) -> Self {
        if index == self.id_index || index >= self.headers.len() {
            return self;
        }
        for row in &mut self.rows {
            let value = std::mem::replace(&mut row.values[index], Value::Null);
            row.values[index] = f(value);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn headers() -> Vec<String> {
        vec!["id".to_string(), "price".to_string()]
    }

    #[test]
    fn test_new_table() {
        let rows = vec![
            Row::new(vec![text("1"), Value::Number(10.0)]),
            Row::new(vec![text("2"), Value::Number(20.0)]),
        ];
        let table = Table::new(headers(), "id", rows).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.id_column(), "id");
        assert_eq!(table.column_index("price"), Some(1));
        assert_eq!(table.value(1, "price"), Some(&Value::Number(20.0)));
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_identifier() {
        let err = Table::new(vec!["price".to_string()], "id", Vec::new()).unwrap_err();
        assert_eq!(err, TableError::MissingIdentifier("id".to_string()));
    }

    #[test]
    fn test_duplicate_identifier() {
        let rows = vec![
            Row::new(vec![text("1"), Value::Number(10.0)]),
            Row::new(vec![text("1"), Value::Number(20.0)]),
        ];
        let err = Table::new(headers(), "id", rows).unwrap_err();
        assert!(matches!(err, TableError::DuplicateIdentifier { row: 1, .. }));
    }

    #[test]
    fn test_null_identifier() {
        let rows = vec![Row::new(vec![Value::Null, Value::Number(10.0)])];
        let err = Table::new(headers(), "id", rows).unwrap_err();
        assert_eq!(err, TableError::NullIdentifier { row: 0 });
    }

    #[test]
    fn test_row_width_mismatch() {
        let rows = vec![Row::new(vec![text("1")])];
        let err = Table::new(headers(), "id", rows).unwrap_err();
        assert!(matches!(err, TableError::RowWidth { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_duplicate_header() {
        let err = Table::new(
            vec!["id".to_string(), "id".to_string()],
            "id",
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("id".to_string()));
    }

    #[test]
    fn test_map_column_skips_identifier() {
        let rows = vec![Row::new(vec![text("1"), Value::Number(10.0)])];
        let table = Table::new(headers(), "id", rows).unwrap();

        let mapped = table.map_column(0, |_| Value::Null);
        assert_eq!(mapped.value(0, "id"), Some(&text("1")));

        let mapped = mapped.map_column(1, |_| Value::Null);
        assert_eq!(mapped.value(0, "price"), Some(&Value::Null));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Number(50.0).to_string(), "50");
        assert_eq!(Value::Number(-73.95).to_string(), "-73.95");
        let ts = chrono::NaiveDate::from_ymd_opt(2019, 5, 21)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Value::Timestamp(ts).to_string(), "2019-05-21 00:00:00");
    }
}
