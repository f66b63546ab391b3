//! Sieve: a versioned basic-cleaning step for tabular listing datasets.
//!
//! Sieve resolves a raw dataset from an artifact store, drops rows with
//! out-of-range prices or coordinates, normalises the `last_review` column
//! to canonical timestamps, and publishes the result as a new artifact
//! version that records which input version it came from.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same input and parameters produce the same bytes
//! - **Pure stages**: every stage takes a table by value and returns a new one
//! - **Lineage**: every output version names its input version and run
//!
//! # Example
//!
//! ```no_run
//! use sieve::{CleaningConfig, CleaningPipeline, JsonRunTracker, LocalArtifactStore};
//!
//! let store = LocalArtifactStore::new("artifacts");
//! let tracker = JsonRunTracker::new("artifacts/_runs");
//! let pipeline = CleaningPipeline::new(store, tracker);
//!
//! let config = CleaningConfig::new(
//!     "sample.csv:latest",
//!     "clean_sample.csv",
//!     "clean_sample",
//!     10.0,
//!     350.0,
//!     "/tmp",
//! );
//! let report = pipeline.run(&config).unwrap();
//! println!("Published {} ({} rows)", report.artifact.id(), report.rows_out);
//! ```

pub mod artifact;
pub mod error;
pub mod filter;
pub mod input;
pub mod pipeline;
pub mod run;
pub mod table;
pub mod temporal;

pub use artifact::{Artifact, ArtifactId, ArtifactRef, ArtifactStore, LocalArtifactStore, PublishRequest};
pub use error::{Result, SieveError};
pub use filter::{FilterSpec, GeoBounds, GeoBoundsFilter, RangeFilter, StageReport, TableStage};
pub use input::{write_csv, Loader, LoaderConfig};
pub use pipeline::{CleaningConfig, CleaningPipeline, CleaningReport};
pub use run::{JsonRunTracker, MemoryRunTracker, RunContext, RunRecord, RunTracker};
pub use table::{Row, Table, TableError, Value};
pub use temporal::{parse_timestamp, TemporalNormalizer};
