//! The per-run input bundle
//!
//! An [`AgentInput`] is the read-only aggregate handed to one agent
//! invocation. All snapshot containers sit behind `Arc`s: cloning a bundle
//! for a concurrent batch is cheap, and no agent can reach mutable state
//! through it.

use bureau_context::{
    ContextSnapshot, DimensionSnapshot, NodeId, RunConfig, SnapshotSet, TimelineEvent,
    TopologyNode,
};
use bureau_insight::Insight;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only input bundle for one agent invocation
#[derive(Debug, Clone)]
pub struct AgentInput {
    /// Ambient context snapshot
    pub context: Option<Arc<ContextSnapshot>>,
    /// Dimension snapshots keyed by node
    pub dimensions: Arc<HashMap<NodeId, DimensionSnapshot>>,
    /// Topology nodes
    pub topology: Arc<Vec<TopologyNode>>,
    /// Timeline events, oldest first
    pub timeline: Arc<Vec<TimelineEvent>>,
    /// Insights visible to this invocation: engine history, then outputs of
    /// agents that ran earlier in the same run
    pub prior_insights: Arc<Vec<Insight>>,
    /// Active run configuration
    pub config: RunConfig,
}

impl AgentInput {
    /// Build a bundle from a snapshot set
    #[must_use]
    pub fn new(snapshots: &SnapshotSet, prior_insights: Vec<Insight>, config: RunConfig) -> Self {
        Self {
            context: snapshots.context.clone().map(Arc::new),
            dimensions: Arc::new(snapshots.dimensions.clone()),
            topology: Arc::new(snapshots.topology.clone()),
            timeline: Arc::new(snapshots.timeline.clone()),
            prior_insights: Arc::new(prior_insights),
            config,
        }
    }

    /// Same snapshots and config, different prior insights
    ///
    /// Used by sequential and staged execution to extend what later agents
    /// see without re-copying the snapshot containers.
    #[must_use]
    pub fn with_prior(&self, prior_insights: Vec<Insight>) -> Self {
        Self {
            context: self.context.clone(),
            dimensions: Arc::clone(&self.dimensions),
            topology: Arc::clone(&self.topology),
            timeline: Arc::clone(&self.timeline),
            prior_insights: Arc::new(prior_insights),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_context::{ContextSnapshot, DimensionSnapshot};

    #[test]
    fn bundle_from_snapshots() {
        let snapshots = SnapshotSet::new()
            .with_context(ContextSnapshot::now())
            .with_dimensions(DimensionSnapshot::new("inbox").with_value("load", 0.5));

        let input = AgentInput::new(&snapshots, Vec::new(), RunConfig::new());

        assert!(input.context.is_some());
        assert_eq!(input.dimensions.len(), 1);
        assert!(input.prior_insights.is_empty());
    }

    #[test]
    fn with_prior_shares_snapshots() {
        let snapshots = SnapshotSet::new().with_context(ContextSnapshot::now());
        let input = AgentInput::new(&snapshots, Vec::new(), RunConfig::new());

        let extended = input.with_prior(Vec::new());

        assert!(Arc::ptr_eq(&input.dimensions, &extended.dimensions));
        assert!(Arc::ptr_eq(&input.timeline, &extended.timeline));
    }
}
