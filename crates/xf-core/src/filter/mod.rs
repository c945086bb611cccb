use thiserror::Error;

mod binning;
mod engine;
mod group;
mod key;
mod predicate;

pub use binning::{BinScale, LENGTH_BIN_COUNT};
pub use engine::{Crossfilter, DimensionId};
pub use group::{Count, Extent, Extrema, Group, Reducer, SumBy};
pub use key::Key;
pub use predicate::Predicate;

/// Errors that can occur when building the filter index
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("dimension '{0}' is already registered")]
    DuplicateDimension(String),
}

/// One aggregate bucket handed to view collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<V> {
    pub key: Key,
    pub value: V,
}

impl<V> Bucket<V> {
    pub fn new(key: Key, value: V) -> Self {
        Self { key, value }
    }
}
