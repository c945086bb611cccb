use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::RawDocumentSet;
use crate::{DataError, DocumentSet};

/// JSON dataset source
///
/// Expects `{ "basicInformation": {...}, "documents": [...] }` as handed
/// over by the dataset service.
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load and parse the whole dataset
    pub fn load(&self) -> Result<DocumentSet, DataError> {
        let file = File::open(&self.path)?;
        let raw: RawDocumentSet = serde_json::from_reader(BufReader::new(file))?;
        let mut set = raw.parse()?;
        if set.basic_information.corpus_name.is_empty() {
            set.basic_information.corpus_name = self.source_name();
        }
        info!(
            source = %self.source_name(),
            documents = set.documents.len(),
            "loaded JSON dataset"
        );
        Ok(set)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_name(&self) -> String {
        super::source_name(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LANGUAGE_NOT_AVAILABLE;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("xf-json-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_json_dataset() {
        let path = write_fixture(
            "ok.json",
            r#"{
                "basicInformation": {"corpusName": "letters", "documentCount": 0},
                "documents": [
                    {"id": "1", "date": "2019-01-03", "textLength": 120.0,
                     "latitude": 59.3, "longitude": 18.1, "language": "sv", "cluster": "0"},
                    {"id": 2, "date": "2019-02-11", "textLength": 80.0,
                     "latitude": 48.8, "longitude": 2.3, "language": "", "cluster": 1}
                ]
            }"#,
        );
        let set = JsonSource::new(&path).load().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(set.basic_information.corpus_name, "letters");
        assert_eq!(set.basic_information.document_count, 2);
        assert_eq!(set.documents[0].id, 1);
        assert_eq!(set.documents[1].language, LANGUAGE_NOT_AVAILABLE);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let path = write_fixture("bad.json", "{ not json");
        let result = JsonSource::new(&path).load();
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(DataError::Json(_))));
    }
}
