//! Sink traits implemented by view collaborators

use xf_core::Bucket;
use xf_data::Document;

/// One bar of the text-length histogram
///
/// `scaled_key` is the real-valued lower edge of the bucket, so consumers
/// can place bars on a value axis instead of a bucket-index axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthBin {
    pub bin: u32,
    pub scaled_key: f64,
    pub count: u64,
}

/// A view fed with ordered `{key, value}` buckets
///
/// `update` may receive an empty slice, meaning "no data under the current
/// filters"; that is an empty state to render, not an error.
pub trait BucketSink: Send {
    /// One-time setup before the first update; no filter dependency
    fn prepare(&mut self) {}

    fn update(&mut self, buckets: &[Bucket<u64>]);
}

/// The text-length histogram view
pub trait LengthSink: Send {
    fn prepare(&mut self) {}

    fn update(&mut self, bins: &[LengthBin]);
}

/// A view fed with the filtered records themselves (the map)
pub trait SpatialSink: Send {
    fn prepare(&mut self) {}

    fn update(&mut self, documents: &[Document]);
}

/// Host-shell notifications after every committed refresh
pub trait HostShell: Send + Sync {
    /// Total number of records passing all active filters
    fn update_selected(&self, count: u64);

    /// Generic "filters changed" signal for downstream bookkeeping
    fn filter_event(&self);
}
