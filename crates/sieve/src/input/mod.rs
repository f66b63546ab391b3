//! Reading and writing delimited table files.

mod loader;
mod writer;

pub use loader::{is_null_token, Loader, LoaderConfig, DEFAULT_NUMERIC_COLUMNS};
pub use writer::{write_csv, write_table};
