//! Core crossfilter engine for the document visualization platform
//!
//! This crate provides the multi-dimensional filter coordination engine:
//! dimensions over a shared record arena, incremental group aggregates,
//! the typed filter-event dispatcher and the shared search state.

pub mod events;
pub mod filter;
pub mod state;

// Re-export commonly used types
pub use events::{Dispatch, EventKind, FilterEvent};
pub use filter::{
    BinScale, Bucket, Count, Crossfilter, DimensionId, Extent, Extrema, FilterError, Group, Key,
    Predicate, Reducer, SumBy, LENGTH_BIN_COUNT,
};
pub use state::SearchState;
