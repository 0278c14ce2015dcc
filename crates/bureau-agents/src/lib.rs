//! Bureau Agents - the analysis capability layer
//!
//! Everything an analysis agent is made of:
//! - [`AnalysisAgent`]: the capability contract every agent implements
//! - [`AgentInput`]: the frozen per-run input bundle
//! - [`harness`]: the shared execution template (readiness validation,
//!   confidence filtering, output budget, observability logging)
//! - [`AgentRegistry`]: static id-to-agent lookup
//! - [`agents`]: the built-in reference agents, including the plan-capable
//!   orchestrator agent
//!
//! Agents are stateless and safe for concurrent reuse; one instance is
//! constructed at registry build time and shared behind an `Arc` for the
//! process lifetime.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod agents;
pub mod contract;
pub mod definition;
pub mod harness;
pub mod input;
pub mod registry;

pub use contract::{AgentError, AnalysisAgent};
pub use definition::{AgentDefinition, EmitKind, Facet};
pub use input::AgentInput;
pub use registry::AgentRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
