//! Console view collaborators
//!
//! Stand-ins for the chart renderers: each sink prints the aggregate it
//! would otherwise draw.

use tracing::trace;

use xf_core::Bucket;
use xf_data::Document;
use xf_views::{BucketSink, HostShell, LengthBin, LengthSink, SpatialSink};

/// Bar-chart stand-in printing `key: value` lines
pub struct ConsoleBuckets {
    title: &'static str,
}

impl ConsoleBuckets {
    pub fn new(title: &'static str) -> Self {
        Self { title }
    }
}

impl BucketSink for ConsoleBuckets {
    fn prepare(&mut self) {
        trace!(view = self.title, "prepared");
    }

    fn update(&mut self, buckets: &[Bucket<u64>]) {
        if buckets.is_empty() {
            println!("{}: (no data)", self.title);
            return;
        }
        let line: Vec<String> = buckets
            .iter()
            .map(|b| format!("{}:{}", b.key, b.value))
            .collect();
        println!("{}: {}", self.title, line.join("  "));
    }
}

/// Histogram stand-in printing bins at their scaled positions
pub struct ConsoleLengths;

impl LengthSink for ConsoleLengths {
    fn update(&mut self, bins: &[LengthBin]) {
        if bins.is_empty() {
            println!("text length: (no data)");
            return;
        }
        let line: Vec<String> = bins
            .iter()
            .map(|b| format!("{:.0}:{}", b.scaled_key, b.count))
            .collect();
        println!("text length: {}", line.join("  "));
    }
}

/// Map stand-in printing how many points it would plot
pub struct ConsoleMap;

impl SpatialSink for ConsoleMap {
    fn update(&mut self, documents: &[Document]) {
        println!("map: {} documents plotted", documents.len());
    }
}

/// Host shell printing the selection summary
pub struct ConsoleShell;

impl HostShell for ConsoleShell {
    fn update_selected(&self, count: u64) {
        println!("selected: {} documents", count);
    }

    fn filter_event(&self) {
        trace!("filter change committed");
    }
}
