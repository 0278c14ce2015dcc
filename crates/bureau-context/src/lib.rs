//! Bureau Context - workspace state snapshots
//!
//! Defines the read-only state an analysis run observes:
//! - Context snapshots (session, focus, activity, health)
//! - Per-node dimension snapshots
//! - Topology nodes and timeline events
//! - Run configuration (time window, thresholds, free-form parameters)
//!
//! Everything here is plain data: the engine and agents receive these types
//! frozen for the duration of a run and never mutate them.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod snapshot;
pub mod types;

pub use config::{ParamSet, ParamValue, RunConfig, TimeWindow};
pub use snapshot::{
    ActivityCounters, ContextSnapshot, DimensionSnapshot, FocusMode, FocusState, HealthCounters,
    SessionStats, SnapshotSet, TimelineEvent, TimelineEventKind, TopologyNode, Trend,
};
pub use types::NodeId;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
