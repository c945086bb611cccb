use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::info;

use crate::document::{BasicInformation, RawDocument};
use crate::{DataError, DocumentSet};

/// CSV dataset source
///
/// Expects a header row `id,date,textLength,latitude,longitude,language,
/// cluster`. Corpus metadata is synthesized from the file itself since CSV
/// has nowhere to carry it.
pub struct CsvSource {
    path: PathBuf,
}

/// One CSV row; the typed fields let the reader do the numeric parsing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    id: u32,
    date: String,
    text_length: f64,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    language: String,
    cluster: i64,
}

impl From<CsvRow> for RawDocument {
    fn from(row: CsvRow) -> Self {
        RawDocument {
            id: row.id,
            date: row.date,
            text_length: row.text_length,
            latitude: row.latitude,
            longitude: row.longitude,
            language: row.language,
            cluster: row.cluster,
        }
    }
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load and parse the whole dataset
    pub fn load(&self) -> Result<DocumentSet, DataError> {
        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut documents = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let raw: RawDocument = row?.into();
            documents.push(raw.parse(index)?);
        }

        let basic_information = BasicInformation {
            corpus_name: self.source_name(),
            document_count: documents.len(),
            ..Default::default()
        };
        info!(
            source = %self.source_name(),
            documents = documents.len(),
            "loaded CSV dataset"
        );
        Ok(DocumentSet {
            basic_information,
            documents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_name(&self) -> String {
        super::source_name(&self.path)
    }
}
