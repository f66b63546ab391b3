//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use sieve::{CleaningConfig, GeoBounds};

use crate::logging::LogFormat;

/// Sieve: clean a raw listings artifact and publish the result
#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory the cleaned file is staged in before publishing
    #[arg(long = "temp_directory", value_name = "DIR")]
    pub temp_directory: PathBuf,

    /// Raw dataset to clean, as name[:version]
    #[arg(long = "input_artifact", value_name = "REF")]
    pub input_artifact: String,

    /// Name of the cleaned artifact
    #[arg(long = "output_artifact", value_name = "NAME")]
    pub output_artifact: String,

    /// Type of the cleaned artifact
    #[arg(long = "output_type", value_name = "TYPE")]
    pub output_type: String,

    /// Description of the cleaned artifact
    #[arg(long = "output_description", default_value = sieve::pipeline::DEFAULT_OUTPUT_DESCRIPTION)]
    pub output_description: String,

    /// Minimum price to keep (inclusive)
    #[arg(long = "min_price", allow_negative_numbers = true)]
    pub min_price: f64,

    /// Maximum price to keep (inclusive)
    #[arg(long = "max_price", allow_negative_numbers = true)]
    pub max_price: f64,

    /// Western longitude bound
    #[arg(long = "longitude_min", default_value_t = GeoBounds::default().longitude_min, allow_negative_numbers = true)]
    pub longitude_min: f64,

    /// Eastern longitude bound
    #[arg(long = "longitude_max", default_value_t = GeoBounds::default().longitude_max, allow_negative_numbers = true)]
    pub longitude_max: f64,

    /// Southern latitude bound
    #[arg(long = "latitude_min", default_value_t = GeoBounds::default().latitude_min, allow_negative_numbers = true)]
    pub latitude_min: f64,

    /// Northern latitude bound
    #[arg(long = "latitude_max", default_value_t = GeoBounds::default().latitude_max, allow_negative_numbers = true)]
    pub latitude_max: f64,

    /// Root directory of the artifact store
    #[arg(long = "artifact_root", env = "SIEVE_ARTIFACT_ROOT", default_value = "artifacts")]
    pub artifact_root: PathBuf,

    /// Directory run records are written to (default: <artifact_root>/_runs)
    #[arg(long = "runs_directory")]
    pub runs_directory: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format (pretty, compact, json)
    #[arg(long = "log_format", default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Cli {
    /// The cleaning parameters carried by these arguments.
    pub fn cleaning_config(&self) -> CleaningConfig {
        CleaningConfig::new(
            self.input_artifact.clone(),
            self.output_artifact.clone(),
            self.output_type.clone(),
            self.min_price,
            self.max_price,
            self.temp_directory.clone(),
        )
        .with_description(self.output_description.clone())
        .with_geo_bounds(GeoBounds::new(
            (self.longitude_min, self.longitude_max),
            (self.latitude_min, self.latitude_max),
        ))
    }

    pub fn runs_directory(&self) -> PathBuf {
        self.runs_directory
            .clone()
            .unwrap_or_else(|| self.artifact_root.join("_runs"))
    }
}
