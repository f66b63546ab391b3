//! Run trackers: where run records end up.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use crate::artifact::ArtifactId;
use crate::error::{Result, SieveError};

use super::record::RunRecord;

/// Records the configuration and lineage of completed runs.
pub trait RunTracker {
    fn record(&self, record: &RunRecord) -> Result<()>;
}

impl<T: RunTracker + ?Sized> RunTracker for &T {
    fn record(&self, record: &RunRecord) -> Result<()> {
        (**self).record(record)
    }
}

/// Writes each record to `<dir>/<run_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonRunTracker {
    dir: PathBuf,
}

impl JsonRunTracker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a record with this id is written to.
    pub fn record_path(&self, run_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", run_id))
    }

    /// Load a previously written record.
    pub fn load(&self, run_id: &str) -> Result<RunRecord> {
        let path = self.record_path(run_id);
        let contents = fs::read(&path).map_err(|e| SieveError::io(&path, e))?;
        Ok(serde_json::from_slice(&contents)?)
    }
}

impl RunTracker for JsonRunTracker {
    fn record(&self, record: &RunRecord) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| SieveError::io(&self.dir, e))?;
        }

        let path = self.record_path(&record.run_id);
        let file = File::create(&path).map_err(|e| SieveError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush().map_err(|e| SieveError::io(&path, e))?;

        info!(
            run_id = %record.run_id,
            input = %display_id(record.input.as_ref()),
            output = %display_id(record.output.as_ref()),
            success = record.is_success(),
            rows_in = record.rows_in,
            rows_out = record.rows_out,
            path = %path.display(),
            "run recorded"
        );
        Ok(())
    }
}

fn display_id(id: Option<&ArtifactId>) -> String {
    id.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Keeps records in memory; useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRunTracker {
    records: Mutex<Vec<RunRecord>>,
}

impl MemoryRunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records seen so far.
    pub fn records(&self) -> Vec<RunRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl RunTracker for MemoryRunTracker {
    fn record(&self, record: &RunRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }
}
