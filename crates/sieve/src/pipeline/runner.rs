//! The cleaning pipeline: resolve, load, filter, normalise, publish.

use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::artifact::{Artifact, ArtifactId, ArtifactStore, PublishRequest};
use crate::error::Result;
use crate::filter::{StageReport, TableStage};
use crate::input::{write_csv, Loader, LoaderConfig};
use crate::run::{RunContext, RunRecord, RunTracker};

use super::config::{CleaningConfig, CleaningPlan};

/// Job type written to run records.
pub const JOB_TYPE: &str = "basic_cleaning";

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub run_id: String,
    /// Input version the run consumed.
    pub input: ArtifactId,
    /// The newly published artifact.
    pub artifact: Artifact,
    pub rows_in: usize,
    pub rows_out: usize,
    pub stages: Vec<StageReport>,
}

/// Runs the fixed cleaning sequence against a store and a tracker.
///
/// Stages run in this order: price range filter, `last_review`
/// normalisation, geographic bounds filter. Columns are checked against
/// the plan before the first stage. Any error ends the run; the output
/// artifact is only published once every stage has succeeded.
pub struct CleaningPipeline<S, T> {
    store: S,
    tracker: T,
    loader: Loader,
}

impl<S: ArtifactStore, T: RunTracker> CleaningPipeline<S, T> {
    pub fn new(store: S, tracker: T) -> Self {
        Self {
            store,
            tracker,
            loader: Loader::new(),
        }
    }

    /// Use a custom loader configuration.
    pub fn with_loader_config(mut self, config: LoaderConfig) -> Self {
        self.loader = Loader::with_config(config);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Run with a fresh [`RunContext`].
    pub fn run(&self, config: &CleaningConfig) -> Result<CleaningReport> {
        self.run_with_context(config, RunContext::new(JOB_TYPE))
    }

    /// Run under a caller-provided context.
    ///
    /// Once the configuration is valid every run is recorded, failed ones
    /// included. A tracker failure on a failed run is logged and the
    /// original error returned.
    pub fn run_with_context(
        &self,
        config: &CleaningConfig,
        context: RunContext,
    ) -> Result<CleaningReport> {
        // Fails fast on bad parameters, before any file I/O.
        let plan = config.plan()?;

        let span = info_span!("basic_cleaning", run_id = %context.run_id());
        let _guard = span.enter();
        info!(config = ?config, "starting run");

        let mut progress = Progress::default();
        match self.execute(config, &plan, &context, &mut progress) {
            Ok(report) => {
                let record = RunRecord::new(
                    &context,
                    config.clone(),
                    report.input.clone(),
                    report.artifact.id(),
                    progress.stages,
                );
                self.tracker.record(&record)?;
                info!(output = %report.artifact.id(), rows = report.rows_out, "cleaning complete");
                Ok(report)
            }
            Err(e) => {
                let record = RunRecord::failed(
                    &context,
                    config.clone(),
                    progress.input,
                    progress.stages,
                    &e,
                );
                if let Err(track_err) = self.tracker.record(&record) {
                    warn!(error = %track_err, "failed to record failed run");
                }
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        config: &CleaningConfig,
        plan: &CleaningPlan,
        context: &RunContext,
        progress: &mut Progress,
    ) -> Result<CleaningReport> {
        let input = self.store.resolve(&plan.input)?;
        progress.input = Some(input.id());
        info!(input = %input.id(), path = %input.path.display(), "resolved input artifact");

        let mut table = self.loader.load(&input.path)?;
        info!(rows = table.row_count(), columns = table.column_count(), "loaded input table");
        plan.check_schema(&table)?;

        let stages: [&dyn TableStage; 3] = [&plan.price_filter, &plan.normalizer, &plan.geo_filter];
        for stage in stages {
            let output = stage.process(table)?;
            info!(
                stage = %output.report.stage,
                detail = %output.report.description,
                rows_in = output.report.rows_in,
                rows_out = output.report.rows_out,
                values_nulled = output.report.values_nulled,
                "stage complete"
            );
            progress.stages.push(output.report);
            table = output.table;
        }

        write_csv(&table, plan.staging_path())?;
        info!(path = %plan.staging_path().display(), "output staged");

        let rows_in = progress.stages.first().map(|r| r.rows_in).unwrap_or_default();
        let request = PublishRequest::new(
            config.output_artifact.clone(),
            config.output_type.clone(),
            plan.staging_path(),
        )
        .with_description(config.output_description.clone())
        .with_input(input.id())
        .with_produced_by(context.run_id())
        .with_metadata("rows_in", rows_in)
        .with_metadata("rows_out", table.row_count())
        .with_metadata("columns", table.column_count());
        let artifact = self.store.publish(request)?;

        Ok(CleaningReport {
            run_id: context.run_id().to_string(),
            input: input.id(),
            artifact,
            rows_in,
            rows_out: table.row_count(),
            stages: progress.stages.clone(),
        })
    }
}

/// What a run got through before it stopped.
#[derive(Debug, Default)]
struct Progress {
    input: Option<ArtifactId>,
    stages: Vec<StageReport>,
}
