//! Run context, run records, and the trackers that persist them.

mod context;
mod record;
mod tracker;

pub use context::RunContext;
pub use record::RunRecord;
pub use tracker::{JsonRunTracker, MemoryRunTracker, RunTracker};
