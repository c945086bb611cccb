//! Dataset sources

pub mod csv_source;
pub mod json_source;

pub use csv_source::CsvSource;
pub use json_source::JsonSource;

use std::path::Path;

/// Display name of a dataset, taken from the file stem
pub(crate) fn source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .to_string()
}
