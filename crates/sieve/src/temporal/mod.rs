//! Date/time parsing and column normalisation.

mod grammar;
mod normalizer;

pub use grammar::parse_timestamp;
pub use normalizer::{TemporalNormalizer, LAST_REVIEW_COLUMN};
