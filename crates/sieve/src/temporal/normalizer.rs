//! Retypes a free-form date column into canonical timestamps.

use tracing::debug;

use crate::error::{Result, SieveError};
use crate::filter::{StageOutput, StageReport, TableStage};
use crate::table::{Table, Value};

use super::grammar::parse_timestamp;

/// Column normalised by the cleaning pipeline.
pub const LAST_REVIEW_COLUMN: &str = "last_review";

/// Converts one column to [`Value::Timestamp`].
///
/// Unparseable values become [`Value::Null`]; rows are never dropped.
#[derive(Debug, Clone)]
pub struct TemporalNormalizer {
    field: String,
}

impl TemporalNormalizer {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for TemporalNormalizer {
    fn default() -> Self {
        Self::new(LAST_REVIEW_COLUMN)
    }
}

fn normalize(value: Value) -> Value {
    let parsed = match &value {
        Value::Timestamp(_) | Value::Null => return value,
        Value::Text(s) => parse_timestamp(s),
        Value::Number(n) => parse_timestamp(&n.to_string()),
    };
    parsed.map_or(Value::Null, Value::Timestamp)
}

impl TableStage for TemporalNormalizer {
    fn process(&self, table: Table) -> Result<StageOutput> {
        let col = table.column_index(&self.field).ok_or_else(|| {
            SieveError::Configuration(format!("field '{}' not found in table", self.field))
        })?;
        if table.id_column() == self.field {
            return Err(SieveError::Configuration(format!(
                "cannot normalise identifier column '{}'",
                self.field
            )));
        }

        let mut report = StageReport::new(
            "temporal_normalizer",
            format!("{} to timestamp", self.field),
        );
        report.rows_in = table.row_count();

        let mut nulled = 0;
        let table = table.map_column(col, |value| {
            let was_null = value.is_null();
            let value = normalize(value);
            if !was_null && value.is_null() {
                nulled += 1;
            }
            value
        });

        report.rows_out = table.row_count();
        report.values_nulled = nulled;
        debug!(
            field = %self.field,
            rows = report.rows_out,
            nulled,
            "temporal column normalised"
        );

        Ok(StageOutput { table, report })
    }
}
