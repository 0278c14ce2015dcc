//! Agent definitions
//!
//! Static metadata describing an analysis agent: its identifier, the input
//! facets it observes, the insight kinds it may emit, a scheduling priority,
//! and whether it may itself emit an execution plan. Immutable once the
//! agent is registered.

use serde::{Deserialize, Serialize};

/// Input facets an agent can declare it observes
///
/// Readiness validation checks declared facets against the input bundle
/// before the agent's analysis runs. `PriorInsights` is always optional and
/// never fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// The ambient context snapshot
    Context,
    /// Per-node dimension snapshots
    Dimensions,
    /// Topology nodes
    Topology,
    /// The event timeline
    Timeline,
    /// Insights from earlier agents or prior runs
    PriorInsights,
}

/// Insight kinds an agent declares it may emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitKind {
    /// Signals
    Signal,
    /// Recommendations
    Recommendation,
    /// Proposals
    Proposal,
    /// Enrichments
    Enrichment,
}

/// Static agent metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Agent identifier (registry key)
    pub id: String,
    /// Human label
    pub label: String,
    /// Facets the agent observes
    pub observes: Vec<Facet>,
    /// Insight kinds the agent may emit
    pub emits: Vec<EmitKind>,
    /// Scheduling priority; lower runs earlier
    pub priority: u8,
    /// Whether the agent may emit an execution plan
    pub plans: bool,
}

impl AgentDefinition {
    /// Create a definition
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            observes: Vec::new(),
            emits: Vec::new(),
            priority: 50,
            plans: false,
        }
    }

    /// With observed facets
    #[inline]
    #[must_use]
    pub fn observes(mut self, facets: &[Facet]) -> Self {
        self.observes = facets.to_vec();
        self
    }

    /// With emitted kinds
    #[inline]
    #[must_use]
    pub fn emits(mut self, kinds: &[EmitKind]) -> Self {
        self.emits = kinds.to_vec();
        self
    }

    /// With scheduling priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the agent plan-capable
    #[inline]
    #[must_use]
    pub fn plan_capable(mut self) -> Self {
        self.plans = true;
        self
    }
}
