//! The stage abstraction shared by every table transformation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::Table;

/// Summary of what one stage did to a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    /// Stage name, e.g. `range_filter`.
    pub stage: String,
    /// Human-readable description of the stage parameters.
    pub description: String,
    /// Rows received.
    pub rows_in: usize,
    /// Rows returned.
    pub rows_out: usize,
    /// Values rewritten to null.
    #[serde(default)]
    pub values_nulled: usize,
}

impl StageReport {
    pub fn new(stage: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            description: description.into(),
            rows_in: 0,
            rows_out: 0,
            values_nulled: 0,
        }
    }

    /// Rows removed by the stage.
    pub fn rows_dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// A stage's output table together with its report.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub table: Table,
    pub report: StageReport,
}

/// A pure transformation over an owned table.
///
/// Stages consume the table they are given and return a new one; they
/// hold no state between calls, so the same stage value can be applied
/// any number of times.
pub trait TableStage {
    /// Run the stage and report on it.
    fn process(&self, table: Table) -> Result<StageOutput>;

    /// Run the stage, discarding the report.
    fn apply(&self, table: Table) -> Result<Table> {
        Ok(self.process(table)?.table)
    }
}
