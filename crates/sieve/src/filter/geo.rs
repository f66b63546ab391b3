//! Longitude/latitude bounding-box filter.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::Table;

use super::range::{FilterSpec, RangeFilter};
use super::stage::{StageOutput, StageReport, TableStage};

pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";

/// Inclusive geographic region of interest.
///
/// The default box covers New York City.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub longitude_min: f64,
    pub longitude_max: f64,
    pub latitude_min: f64,
    pub latitude_max: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self {
            longitude_min: -74.25,
            longitude_max: -73.50,
            latitude_min: 40.5,
            latitude_max: 41.2,
        }
    }
}

impl GeoBounds {
    pub fn new(longitude: (f64, f64), latitude: (f64, f64)) -> Self {
        Self {
            longitude_min: longitude.0,
            longitude_max: longitude.1,
            latitude_min: latitude.0,
            latitude_max: latitude.1,
        }
    }

    /// The two range predicates, longitude first.
    pub fn specs(&self) -> Result<(FilterSpec, FilterSpec)> {
        Ok((
            FilterSpec::new(LONGITUDE_COLUMN, self.longitude_min, self.longitude_max)?,
            FilterSpec::new(LATITUDE_COLUMN, self.latitude_min, self.latitude_max)?,
        ))
    }
}

/// Keeps rows whose longitude and latitude both fall inside [`GeoBounds`].
#[derive(Debug, Clone)]
pub struct GeoBoundsFilter {
    longitude: RangeFilter,
    latitude: RangeFilter,
}

impl GeoBoundsFilter {
    /// Fails with a configuration error when either range is invalid.
    pub fn new(bounds: GeoBounds) -> Result<Self> {
        let (longitude, latitude) = bounds.specs()?;
        Ok(Self {
            longitude: RangeFilter::new(longitude),
            latitude: RangeFilter::new(latitude),
        })
    }
}

impl TableStage for GeoBoundsFilter {
    fn process(&self, table: Table) -> Result<StageOutput> {
        let rows_in = table.row_count();
        let lon = self.longitude.process(table)?;
        let lat = self.latitude.process(lon.table)?;

        let mut report = StageReport::new(
            "geo_bounds_filter",
            format!("{}; {}", lon.report.description, lat.report.description),
        );
        report.rows_in = rows_in;
        report.rows_out = lat.table.row_count();

        Ok(StageOutput {
            table: lat.table,
            report,
        })
    }
}
