//! Per-run context passed explicitly through the pipeline.

use chrono::{DateTime, Utc};

/// Identity and start time of one cleaning run.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    job_type: String,
    started_at: DateTime<Utc>,
}

impl RunContext {
    /// Start a new run with a fresh identifier.
    pub fn new(job_type: impl Into<String>) -> Self {
        let started_at = Utc::now();
        let run_id = format!(
            "run-{}-{}",
            started_at.format("%Y%m%dT%H%M%S%.6f").to_string().replace('.', ""),
            std::process::id()
        );
        Self {
            run_id,
            job_type: job_type.into(),
            started_at,
        }
    }

    /// Start a run with a caller-chosen identifier.
    pub fn with_id(job_type: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            job_type: job_type.into(),
            started_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
