//! Document record model
//!
//! Documents arrive over the wire with string dates and loosely typed
//! ids; everything is parsed exactly once at load and immutable after.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::DataError;

/// Sentinel label for documents without a language value
pub const LANGUAGE_NOT_AVAILABLE: &str = "n.a.";

/// Wire format of document dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fully parsed document record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u32,
    pub date: NaiveDate,
    pub text_length: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub language: String,
    pub cluster: i64,
}

/// Corpus-level metadata supplied alongside the documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicInformation {
    pub corpus_name: String,
    pub document_count: usize,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A loaded dataset: corpus metadata plus the record arena
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    pub basic_information: BasicInformation,
    pub documents: Vec<Document>,
}

/// A document as it appears on the wire
///
/// `id` and `cluster` may arrive as numbers or numeric strings; `date` is
/// an ISO-8601 string; `language` may be absent or empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(deserialize_with = "u32_from_number_or_string")]
    pub id: u32,
    pub date: String,
    pub text_length: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub language: String,
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub cluster: i64,
}

impl RawDocument {
    /// Parse the wire form into a typed record
    ///
    /// `index` is the document's position in the dataset, carried into
    /// errors so a bad record is loud, never silently dropped. A missing
    /// language is data, not damage: it becomes the sentinel label and
    /// stays countable.
    pub fn parse(self, index: usize) -> Result<Document, DataError> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            DataError::InvalidDate {
                index,
                value: self.date.clone(),
            }
        })?;
        let language = if self.language.trim().is_empty() {
            LANGUAGE_NOT_AVAILABLE.to_string()
        } else {
            self.language
        };
        Ok(Document {
            id: self.id,
            date,
            text_length: self.text_length,
            latitude: self.latitude,
            longitude: self.longitude,
            language,
            cluster: self.cluster,
        })
    }
}

/// Wire format of a whole dataset
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocumentSet {
    #[serde(default)]
    pub basic_information: BasicInformation,
    pub documents: Vec<RawDocument>,
}

impl RawDocumentSet {
    pub fn parse(self) -> Result<DocumentSet, DataError> {
        let documents = self
            .documents
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.parse(index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut basic_information = self.basic_information;
        if basic_information.document_count == 0 {
            basic_information.document_count = documents.len();
        }
        Ok(DocumentSet {
            basic_information,
            documents,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn i64_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not a number: '{}'", s))),
    }
}

fn u32_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64_from_number_or_string(deserializer)?;
    u32::try_from(value)
        .map_err(|_| serde::de::Error::custom(format!("id out of range: {}", value)))
}
