//! The structured record written for every completed run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;
use crate::error::SieveError;
use crate::filter::StageReport;
use crate::pipeline::CleaningConfig;

use super::context::RunContext;

/// Config snapshot, lineage, and stage summaries of one run.
///
/// Failed runs are recorded too: `output` is then absent and `error`
/// holds the failure. `input` is absent when the input never resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub job_type: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Full parameter set the run was invoked with.
    pub config: CleaningConfig,
    /// Input artifact version consumed.
    pub input: Option<ArtifactId>,
    /// Output artifact version produced.
    pub output: Option<ArtifactId>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub stages: Vec<StageReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn new(
        context: &RunContext,
        config: CleaningConfig,
        input: ArtifactId,
        output: ArtifactId,
        stages: Vec<StageReport>,
    ) -> Self {
        Self::build(context, config, Some(input), Some(output), stages, None)
    }

    /// Record of a run that stopped with `error`.
    pub fn failed(
        context: &RunContext,
        config: CleaningConfig,
        input: Option<ArtifactId>,
        stages: Vec<StageReport>,
        error: &SieveError,
    ) -> Self {
        Self::build(context, config, input, None, stages, Some(error.to_string()))
    }

    fn build(
        context: &RunContext,
        config: CleaningConfig,
        input: Option<ArtifactId>,
        output: Option<ArtifactId>,
        stages: Vec<StageReport>,
        error: Option<String>,
    ) -> Self {
        let rows_in = stages.first().map(|s| s.rows_in).unwrap_or_default();
        let rows_out = stages.last().map(|s| s.rows_out).unwrap_or_default();
        Self {
            run_id: context.run_id().to_string(),
            job_type: context.job_type().to_string(),
            started_at: context.started_at(),
            finished_at: Utc::now(),
            config,
            input,
            output,
            rows_in,
            rows_out,
            stages,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
