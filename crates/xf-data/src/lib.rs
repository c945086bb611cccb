//! Document data model and dataset sources for the visualization platform

pub mod document;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use document::{
    BasicInformation, Document, DocumentSet, RawDocument, DATE_FORMAT, LANGUAGE_NOT_AVAILABLE,
};
pub use sources::{CsvSource, JsonSource};

/// Errors that can occur when loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("document {index}: invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { index: usize, value: String },

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
