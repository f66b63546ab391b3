//! End-to-end tests for the cleaning pipeline against a local store.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};

use sieve::artifact::{ArtifactId, ArtifactStore, LocalArtifactStore, PublishRequest};
use sieve::pipeline::JOB_TYPE;
use sieve::{
    CleaningConfig, CleaningPipeline, GeoBounds, JsonRunTracker, MemoryRunTracker, RunRecord,
    RunTracker, SieveError,
};

const LISTINGS: &str = "id,name,price,last_review,latitude,longitude\n\
                        1,\"Loft, Brooklyn\",150,2019-05-21,40.7,-73.95\n\
                        2,Mansion,5000,2019-01-01,40.7,-73.95\n\
                        3,Studio,9,2019-02-11,40.72,-73.99\n\
                        4,Room,80,not-a-date,40.68,-73.9\n\
                        5,Boston Room,120,2018-07-01,42.36,-71.06\n\
                        6,Cabin,200,,40.8,-73.97\n";

const EXPECTED: &str = "id,name,price,last_review,latitude,longitude\n\
                        1,\"Loft, Brooklyn\",150,2019-05-21 00:00:00,40.7,-73.95\n\
                        4,Room,80,,40.68,-73.9\n\
                        6,Cabin,200,,40.8,-73.97\n";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

struct Workspace {
    store_dir: TempDir,
    temp_dir: TempDir,
}

impl Workspace {
    /// A store holding `sample.csv:v1` with the given contents.
    fn with_raw(contents: &str) -> Self {
        let store_dir = TempDir::new().expect("Failed to create store dir");
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let raw_dir = TempDir::new().expect("Failed to create raw dir");
        let raw = raw_dir.path().join("sample.csv");
        fs::write(&raw, contents).expect("Failed to write raw data");
        LocalArtifactStore::new(store_dir.path())
            .publish(PublishRequest::new("sample.csv", "raw_data", &raw))
            .expect("Failed to seed store");

        Self { store_dir, temp_dir }
    }

    fn store(&self) -> LocalArtifactStore {
        LocalArtifactStore::new(self.store_dir.path())
    }

    fn config(&self, min_price: f64, max_price: f64) -> CleaningConfig {
        CleaningConfig::new(
            "sample.csv:latest",
            "clean_sample.csv",
            "clean_sample",
            min_price,
            max_price,
            self.temp_dir.path(),
        )
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read output")
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_cleans_and_publishes_new_version() {
    let ws = Workspace::with_raw(LISTINGS);
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);

    let report = pipeline.run(&ws.config(10.0, 350.0)).expect("Run failed");

    assert_eq!(report.rows_in, 6);
    assert_eq!(report.rows_out, 3);
    assert_eq!(report.artifact.id(), ArtifactId::new("clean_sample.csv", 1));
    assert_eq!(report.artifact.artifact_type, "clean_sample");
    assert_eq!(
        report.artifact.description,
        "Data with outliers and null values removed"
    );
    assert_eq!(read(&report.artifact.path), EXPECTED);

    let stages: Vec<_> = report.stages.iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(
        stages,
        vec!["range_filter", "temporal_normalizer", "geo_bounds_filter"]
    );
    assert_eq!(report.stages[0].rows_dropped(), 2);
    assert_eq!(report.stages[1].values_nulled, 1);
    assert_eq!(report.stages[2].rows_dropped(), 1);
}

#[test]
fn test_price_then_geo_counts() {
    let ws = Workspace::with_raw(
        "id,price,last_review,latitude,longitude\n\
         a,0,2019-05-21,40.7,-73.9\n\
         b,50,2019-05-21,40.7,-73.9\n\
         c,500,2019-05-21,40.7,-73.9\n\
         d,1000,2019-05-21,34.05,-118.24\n\
         e,5000,2019-05-21,40.7,-73.9\n",
    );
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let report = pipeline.run(&ws.config(10.0, 1000.0)).expect("Run failed");

    assert_eq!(report.stages[0].rows_out, 3);
    assert_eq!(report.rows_out, 2);
    let output = read(&report.artifact.path);
    assert!(output.contains("\nb,50,2019-05-21 00:00:00,"));
    assert!(output.contains("\nc,500,"));
    assert!(!output.contains("\nd,"));
}

#[test]
fn test_staged_file_matches_published_file() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let report = pipeline.run(&ws.config(10.0, 350.0)).expect("Run failed");

    let staged = ws.temp_dir.path().join("clean_sample.csv");
    assert_eq!(read(&staged), read(&report.artifact.path));
}

#[test]
fn test_price_bounds_are_inclusive() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let report = pipeline.run(&ws.config(80.0, 150.0)).expect("Run failed");

    let output = read(&report.artifact.path);
    assert!(output.contains("\n1,"));
    assert!(output.contains("\n4,"));
    assert!(!output.contains("\n6,"));
    assert_eq!(report.rows_out, 2);
}

#[test]
fn test_custom_geo_bounds() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());
    let boston = GeoBounds::new((-71.2, -70.9), (42.2, 42.5));

    let report = pipeline
        .run(&ws.config(10.0, 350.0).with_geo_bounds(boston))
        .expect("Run failed");

    assert_eq!(report.rows_out, 1);
    assert!(read(&report.artifact.path).contains("Boston Room"));
}

#[test]
fn test_empty_result_still_publishes_header() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let report = pipeline.run(&ws.config(6000.0, 7000.0)).expect("Run failed");

    assert_eq!(report.rows_out, 0);
    assert_eq!(
        read(&report.artifact.path),
        "id,name,price,last_review,latitude,longitude\n"
    );
}

// =============================================================================
// Determinism and Lineage
// =============================================================================

#[test]
fn test_repeated_runs_are_byte_identical() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());
    let config = ws.config(10.0, 350.0);

    let first = pipeline.run(&config).expect("First run failed");
    let second = pipeline.run(&config).expect("Second run failed");

    assert_eq!(first.artifact.version, 1);
    assert_eq!(second.artifact.version, 2);
    assert_eq!(first.artifact.digest, second.artifact.digest);
    assert_eq!(read(&first.artifact.path), read(&second.artifact.path));
    assert_eq!(ws.store().versions("clean_sample.csv").unwrap(), vec![1, 2]);
}

#[test]
fn test_lineage_and_run_record() {
    let ws = Workspace::with_raw(LISTINGS);
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);
    let config = ws.config(10.0, 350.0).with_description("cleaned listings");

    let report = pipeline.run(&config).expect("Run failed");

    let input = ArtifactId::new("sample.csv", 1);
    assert_eq!(report.input, input);
    assert_eq!(report.artifact.lineage, vec![input.clone()]);
    assert_eq!(report.artifact.produced_by.as_deref(), Some(report.run_id.as_str()));
    assert_eq!(report.artifact.metadata["rows_in"], 6);
    assert_eq!(report.artifact.metadata["rows_out"], 3);

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.run_id, report.run_id);
    assert_eq!(record.job_type, JOB_TYPE);
    assert_eq!(record.config, config);
    assert!(record.is_success());
    assert_eq!(record.input, Some(input));
    assert_eq!(record.output, Some(report.artifact.id()));
    assert_eq!((record.rows_in, record.rows_out), (6, 3));
    assert!(record.finished_at >= record.started_at);
}

#[test]
fn test_json_tracker_persists_record() {
    let ws = Workspace::with_raw(LISTINGS);
    let runs_dir = ws.store_dir.path().join("_runs");
    let tracker = JsonRunTracker::new(&runs_dir);
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);

    let report = pipeline.run(&ws.config(10.0, 350.0)).expect("Run failed");

    let record = tracker.load(&report.run_id).expect("Record missing");
    assert_eq!(record.output, Some(ArtifactId::new("clean_sample.csv", 1)));
    assert!(record.error.is_none());
    assert_eq!(record.stages.len(), 3);
    assert_eq!(record.config.min_price, 10.0);
}

#[test]
fn test_exact_input_version_is_honoured() {
    let ws = Workspace::with_raw(LISTINGS);
    let newer = create_test_file("id,name,price,last_review,latitude,longitude\n9,New,100,,40.7,-73.9\n");
    let renamed = ws.temp_dir.path().join("sample.csv");
    fs::copy(newer.path(), &renamed).unwrap();
    ws.store()
        .publish(PublishRequest::new("sample.csv", "raw_data", &renamed))
        .unwrap();

    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());
    let mut config = ws.config(10.0, 350.0);
    config.input_artifact = "sample.csv:v1".to_string();

    let report = pipeline.run(&config).expect("Run failed");
    assert_eq!(report.rows_out, 3);
    assert_eq!(report.artifact.lineage, vec![ArtifactId::new("sample.csv", 1)]);

    config.input_artifact = "sample.csv".to_string();
    let latest = pipeline.run(&config).expect("Run failed");
    assert_eq!(latest.rows_out, 1);
    assert_eq!(latest.artifact.lineage, vec![ArtifactId::new("sample.csv", 2)]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_invalid_bounds_fail_before_any_io() {
    let temp_dir = TempDir::new().unwrap();
    let missing_store = temp_dir.path().join("no-such-store");
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(LocalArtifactStore::new(&missing_store), &tracker);
    let config = CleaningConfig::new(
        "sample.csv",
        "clean_sample.csv",
        "clean_sample",
        500.0,
        10.0,
        temp_dir.path(),
    );

    let err = pipeline.run(&config).unwrap_err();
    assert!(matches!(err, SieveError::Configuration(_)));
    assert!(!missing_store.exists());
    assert!(!temp_dir.path().join("clean_sample.csv").exists());
    assert!(tracker.records().is_empty());
}

#[test]
fn test_missing_store_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = CleaningPipeline::new(
        LocalArtifactStore::new(temp_dir.path().join("no-such-store")),
        MemoryRunTracker::new(),
    );
    let config = CleaningConfig::new(
        "sample.csv",
        "clean_sample.csv",
        "clean_sample",
        10.0,
        350.0,
        temp_dir.path(),
    );

    let err = pipeline.run(&config).unwrap_err();
    assert!(matches!(err, SieveError::StoreUnavailable(_)));
}

#[test]
fn test_unknown_input_artifact() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());
    let mut config = ws.config(10.0, 350.0);
    config.input_artifact = "other.csv:latest".to_string();

    let err = pipeline.run(&config).unwrap_err();
    assert!(matches!(err, SieveError::ArtifactNotFound(_)));
}

#[test]
fn test_missing_id_column_is_malformed() {
    let ws = Workspace::with_raw("name,price,last_review,latitude,longitude\nRoom,80,,40.7,-73.9\n");
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    assert!(matches!(err, SieveError::MalformedInput { .. }));
    assert!(ws.store().versions("clean_sample.csv").unwrap().is_empty());

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_success());
    assert_eq!(records[0].input, Some(ArtifactId::new("sample.csv", 1)));
    assert_eq!(records[0].output, None);
    assert!(records[0].stages.is_empty());
}

#[test]
fn test_missing_latitude_fails_before_any_stage() {
    let ws = Workspace::with_raw(
        "id,name,price,last_review,longitude
         1,Loft,150,2019-05-21,-73.95
         2,Room,80,2019-06-01,-73.90
",
    );
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    let SieveError::Configuration(message) = &err else {
        panic!("expected configuration error, got {:?}", err);
    };
    assert!(message.contains("latitude"));

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].stages.is_empty(), "no stage may run before the column check");
    assert_eq!((records[0].rows_in, records[0].rows_out), (0, 0));
    assert!(!ws.temp_dir.path().join("clean_sample.csv").exists());
    assert!(ws.store().versions("clean_sample.csv").unwrap().is_empty());
}

#[test]
fn test_failed_run_keeps_config_snapshot() {
    let ws = Workspace::with_raw(LISTINGS);
    let tracker = MemoryRunTracker::new();
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);
    let mut config = ws.config(10.0, 350.0);
    config.input_artifact = "other.csv:v3".to_string();

    let err = pipeline.run(&config).unwrap_err();
    assert!(matches!(err, SieveError::ArtifactNotFound(_)));

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.config, config);
    assert_eq!(record.input, None);
    assert_eq!(record.output, None);
    assert_eq!(record.error.as_deref(), Some(err.to_string().as_str()));
}

#[test]
fn test_failed_run_written_by_json_tracker() {
    let ws = Workspace::with_raw("id,price\n1,80\n");
    let tracker = JsonRunTracker::new(ws.store_dir.path().join("_runs"));
    let pipeline = CleaningPipeline::new(ws.store(), &tracker);

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    assert!(matches!(err, SieveError::Configuration(_)));

    let written: Vec<_> = fs::read_dir(tracker.dir()).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_ragged_rows_are_malformed() {
    let ws = Workspace::with_raw("id,name,price,last_review,latitude,longitude\n1,Room,80\n");
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    assert!(matches!(err, SieveError::MalformedInput { .. }));
}

#[test]
fn test_missing_price_column_is_configuration_error() {
    let ws = Workspace::with_raw("id,name,last_review,latitude,longitude\n1,Room,,40.7,-73.9\n");
    let pipeline = CleaningPipeline::new(ws.store(), MemoryRunTracker::new());

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    assert!(matches!(err, SieveError::Configuration(_)));
    assert!(ws.store().versions("clean_sample.csv").unwrap().is_empty());
}

struct FailingTracker;

impl RunTracker for FailingTracker {
    fn record(&self, _record: &RunRecord) -> sieve::Result<()> {
        Err(SieveError::StoreUnavailable("tracker offline".to_string()))
    }
}

#[test]
fn test_tracker_failure_is_reported_after_publish() {
    let ws = Workspace::with_raw(LISTINGS);
    let pipeline = CleaningPipeline::new(ws.store(), FailingTracker);

    let err = pipeline.run(&ws.config(10.0, 350.0)).unwrap_err();
    assert!(matches!(err, SieveError::StoreUnavailable(_)));
    assert_eq!(ws.store().versions("clean_sample.csv").unwrap(), vec![1]);
}
