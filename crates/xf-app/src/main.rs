//! Main application entry point
//!
//! Loads a document dataset (or generates a demo corpus), attaches console
//! views and walks through a short filter session so the whole
//! dispatch → filter → refresh cycle runs end to end.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use xf_core::FilterEvent;
use xf_data::{CsvSource, DocumentSet, JsonSource};
use xf_views::ViewCoordinator;

mod console;
mod demo;

use console::{ConsoleBuckets, ConsoleLengths, ConsoleMap, ConsoleShell};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let set = match std::env::args().nth(1) {
        Some(path) => load_dataset(Path::new(&path))
            .with_context(|| format!("failed to load dataset '{}'", path))?,
        None => {
            info!("no dataset given; generating demo corpus");
            demo::demo_documents()?
        }
    };
    info!(
        corpus = %set.basic_information.corpus_name,
        documents = set.documents.len(),
        "dataset ready"
    );

    let mut coordinator = ViewCoordinator::new(Arc::new(ConsoleShell));
    coordinator.attach_date_sink(ConsoleBuckets::new("documents per year"));
    coordinator.attach_length_sink(ConsoleLengths);
    coordinator.attach_map_sink(ConsoleMap);
    coordinator.attach_language_sink(ConsoleBuckets::new("languages"));
    coordinator.attach_cluster_sink(ConsoleBuckets::new("clusters"));
    coordinator.set_documents(set)?;

    println!("\n== select language 'en' ==");
    coordinator.emit(FilterEvent::LanguageSelected {
        language: "en".to_string(),
    })?;

    println!("\n== restrict dates to 2019 ==");
    coordinator.emit(FilterEvent::DateCommitted {
        range: (date(2019, 1, 1)?, date(2020, 1, 1)?),
    })?;

    println!("\n== clear all filters ==");
    coordinator.emit(FilterEvent::DateCleared)?;
    coordinator.emit(FilterEvent::LanguageCleared)?;

    Ok(())
}

fn load_dataset(path: &Path) -> Result<DocumentSet> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(JsonSource::new(path).load()?),
        Some("csv") => Ok(CsvSource::new(path).load()?),
        other => bail!("unsupported dataset format: {:?}", other),
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {}-{}-{}", year, month, day))
}
