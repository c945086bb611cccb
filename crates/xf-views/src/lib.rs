//! View coordination for the document crossfilter engine
//!
//! Rendering lives entirely outside this workspace; what lives here is the
//! seam between the filter engine and whatever draws: sink traits each view
//! implements, the host-shell notification trait, and the coordinator that
//! owns the engine and drives the refresh cycle.

mod coordinator;
mod sinks;

pub use coordinator::{ViewCoordinator, CLUSTER_TOP};
pub use sinks::{BucketSink, HostShell, LengthBin, LengthSink, SpatialSink};
