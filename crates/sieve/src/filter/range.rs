//! Inclusive numeric range filter.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SieveError};
use crate::table::Table;

use super::stage::{StageOutput, StageReport, TableStage};

/// Inclusive bounds on one numeric field.
///
/// Construct through [`FilterSpec::new`], which rejects inverted or
/// non-finite bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    field: String,
    min: f64,
    max: f64,
}

impl FilterSpec {
    pub fn new(field: impl Into<String>, min: f64, max: f64) -> Result<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(SieveError::Configuration(
                "range filter field name is empty".to_string(),
            ));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(SieveError::Configuration(format!(
                "bounds for '{}' must be finite (got {} - {})",
                field, min, max
            )));
        }
        if min > max {
            return Err(SieveError::Configuration(format!(
                "bounds for '{}' are inverted: min {} > max {}",
                field, min, max
            )));
        }
        Ok(Self { field, min, max })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether a value lies within the bounds. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Drops rows whose field is null, non-numeric, or outside the bounds.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    spec: FilterSpec,
}

impl RangeFilter {
    pub fn new(spec: FilterSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }
}

impl TableStage for RangeFilter {
    fn process(&self, table: Table) -> Result<StageOutput> {
        let spec = &self.spec;
        let col = table.column_index(spec.field()).ok_or_else(|| {
            SieveError::Configuration(format!("field '{}' not found in table", spec.field()))
        })?;

        let mut report = StageReport::new(
            "range_filter",
            format!("{} in [{}, {}]", spec.field(), spec.min(), spec.max()),
        );
        report.rows_in = table.row_count();

        let table = table.retain_rows(|row| {
            row.get(col)
                .and_then(|v| v.as_number())
                .is_some_and(|n| spec.contains(n))
        });

        report.rows_out = table.row_count();
        debug!(
            field = spec.field(),
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "range filter applied"
        );

        Ok(StageOutput { table, report })
    }
}
