//! Built-in analysis agents
//!
//! Reference implementations of the capability contract. Heuristics are
//! deliberately simple threshold logic; the value of these agents is that
//! they exercise the template, registry, and engine end to end.

mod dimension_drift;
mod focus_pattern;
mod meta_orchestrator;
mod topology_health;

pub use dimension_drift::DimensionDriftAgent;
pub use focus_pattern::FocusPatternAgent;
pub use meta_orchestrator::MetaOrchestratorAgent;
pub use topology_health::TopologyHealthAgent;
