//! Deterministic demo corpus for running without a dataset file

use anyhow::Result;
use xf_data::document::{RawDocument, RawDocumentSet};
use xf_data::{BasicInformation, DocumentSet};

const LANGUAGES: [&str; 5] = ["en", "fr", "de", "sv", ""];

/// Generate a small document corpus spread over four years
///
/// Goes through the same wire-format parsing as a real dataset, so the
/// empty-language documents end up in the sentinel bucket like they would
/// in production data.
pub fn demo_documents() -> Result<DocumentSet> {
    let documents = (0..48u32)
        .map(|i| RawDocument {
            id: i,
            date: format!("{}-{:02}-{:02}", 2018 + i % 4, 1 + i % 12, 1 + (i * 7) % 28),
            text_length: 120.0 + (i as f64 * 83.0) % 1400.0,
            latitude: 36.0 + (i as f64 * 5.3) % 25.0,
            longitude: -9.0 + (i as f64 * 11.7) % 40.0,
            language: LANGUAGES[i as usize % LANGUAGES.len()].to_string(),
            cluster: (i % 6) as i64,
        })
        .collect();

    let set = RawDocumentSet {
        basic_information: BasicInformation {
            corpus_name: "demo corpus".to_string(),
            ..Default::default()
        },
        documents,
    }
    .parse()?;
    Ok(set)
}
