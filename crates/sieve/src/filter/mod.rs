//! Row filters and the stage trait they implement.
//!
//! Every filter is a stable, order-preserving predicate over an owned
//! [`Table`](crate::table::Table). Filters compose by sequential passes;
//! since none has side effects the surviving row set does not depend on
//! the order in which they run.

mod geo;
mod range;
mod stage;

pub use geo::{GeoBounds, GeoBoundsFilter, LATITUDE_COLUMN, LONGITUDE_COLUMN};
pub use range::{FilterSpec, RangeFilter};
pub use stage::{StageOutput, StageReport, TableStage};
