//! Cleaning run parameters and their validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::{validate_artifact_name, ArtifactRef};
use crate::error::{Result, SieveError};
use crate::filter::{
    FilterSpec, GeoBounds, GeoBoundsFilter, RangeFilter, LATITUDE_COLUMN, LONGITUDE_COLUMN,
};
use crate::table::Table;
use crate::temporal::{TemporalNormalizer, LAST_REVIEW_COLUMN};

/// Column the price bounds apply to.
pub const PRICE_COLUMN: &str = "price";

/// Description used when none is given.
pub const DEFAULT_OUTPUT_DESCRIPTION: &str = "Data with outliers and null values removed";

/// Full parameter set of a cleaning run.
///
/// This is also the configuration snapshot stored in the run record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Reference (`name[:version]`) of the raw dataset.
    pub input_artifact: String,
    /// Name of the artifact to publish.
    pub output_artifact: String,
    /// Type tag of the published artifact.
    pub output_type: String,
    /// Description of the published artifact.
    #[serde(default = "default_description")]
    pub output_description: String,
    /// Inclusive lower price bound.
    pub min_price: f64,
    /// Inclusive upper price bound.
    pub max_price: f64,
    /// Region of interest; defaults to New York City.
    #[serde(default)]
    pub geo_bounds: GeoBounds,
    /// Directory the output is staged in before publishing.
    pub temp_directory: PathBuf,
}

fn default_description() -> String {
    DEFAULT_OUTPUT_DESCRIPTION.to_string()
}

impl CleaningConfig {
    pub fn new(
        input_artifact: impl Into<String>,
        output_artifact: impl Into<String>,
        output_type: impl Into<String>,
        min_price: f64,
        max_price: f64,
        temp_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_artifact: input_artifact.into(),
            output_artifact: output_artifact.into(),
            output_type: output_type.into(),
            output_description: default_description(),
            min_price,
            max_price,
            geo_bounds: GeoBounds::default(),
            temp_directory: temp_directory.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.output_description = description.into();
        self
    }

    pub fn with_geo_bounds(mut self, bounds: GeoBounds) -> Self {
        self.geo_bounds = bounds;
        self
    }

    /// Where the output file is written before publishing.
    pub fn staging_path(&self) -> PathBuf {
        self.temp_directory.join(&self.output_artifact)
    }

    /// Validate every parameter without touching the filesystem.
    pub fn plan(&self) -> Result<CleaningPlan> {
        let input: ArtifactRef = self.input_artifact.parse()?;
        validate_artifact_name(&self.output_artifact)?;
        if self.output_type.trim().is_empty() {
            return Err(SieveError::Configuration(
                "output artifact type is empty".to_string(),
            ));
        }
        if self.temp_directory.as_os_str().is_empty() {
            return Err(SieveError::Configuration(
                "temporary directory is empty".to_string(),
            ));
        }

        let price = FilterSpec::new(PRICE_COLUMN, self.min_price, self.max_price)?;
        let geo_filter = GeoBoundsFilter::new(self.geo_bounds)?;

        Ok(CleaningPlan {
            input,
            price_filter: RangeFilter::new(price),
            normalizer: TemporalNormalizer::new(LAST_REVIEW_COLUMN),
            geo_filter,
            staging_path: self.staging_path(),
        })
    }
}

/// A validated configuration, ready to execute.
#[derive(Debug, Clone)]
pub struct CleaningPlan {
    pub input: ArtifactRef,
    pub price_filter: RangeFilter,
    pub normalizer: TemporalNormalizer,
    pub geo_filter: GeoBoundsFilter,
    pub staging_path: PathBuf,
}

impl CleaningPlan {
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Every column read by some stage of the plan.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.price_filter.spec().field(),
            self.normalizer.field(),
            LONGITUDE_COLUMN,
            LATITUDE_COLUMN,
        ]
    }

    /// Check a loaded table against the plan before any stage runs.
    ///
    /// Lists every missing column in one configuration error.
    pub fn check_schema(&self, table: &Table) -> Result<()> {
        let missing: Vec<&str> = self
            .required_columns()
            .into_iter()
            .filter(|column| !table.has_column(column))
            .collect();
        if !missing.is_empty() {
            return Err(SieveError::Configuration(format!(
                "input is missing required column(s): {}",
                missing.join(", ")
            )));
        }
        if table.id_column() == self.normalizer.field() {
            return Err(SieveError::Configuration(format!(
                "cannot normalise identifier column '{}'",
                self.normalizer.field()
            )));
        }
        Ok(())
    }
}
