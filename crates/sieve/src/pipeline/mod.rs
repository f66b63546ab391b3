//! Cleaning configuration and the pipeline that executes it.

mod config;
mod runner;

pub use config::{CleaningConfig, CleaningPlan, DEFAULT_OUTPUT_DESCRIPTION, PRICE_COLUMN};
pub use runner::{CleaningPipeline, CleaningReport, JOB_TYPE};
