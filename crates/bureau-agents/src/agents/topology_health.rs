//! Topology health agent
//!
//! Surfaces stale nodes and annotates the workspace with an aggregate
//! link-density reading.

use crate::contract::{AgentError, AnalysisAgent};
use crate::definition::{AgentDefinition, EmitKind, Facet};
use crate::input::AgentInput;
use bureau_insight::{
    EnrichmentPayload, Insight, InsightKind, Scope, SignalKind, SignalPayload, Target,
    TargetSubject,
};
use chrono::Utc;

/// Flags stale nodes and computes link density
#[derive(Debug)]
pub struct TopologyHealthAgent {
    definition: AgentDefinition,
}

impl TopologyHealthAgent {
    /// Create the agent
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: AgentDefinition::new("topology-health", "Topology health analysis")
                .observes(&[Facet::Topology])
                .emits(&[EmitKind::Signal, EmitKind::Enrichment])
                .with_priority(30),
        }
    }
}

impl Default for TopologyHealthAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for TopologyHealthAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        let mut insights = Vec::new();

        let window = chrono::Duration::from_std(input.config.window.duration())
            .map_err(|e| AgentError::MissingInput(format!("unusable window: {e}")))?;
        let cutoff = Utc::now() - window;

        for node in input.topology.iter() {
            if node.updated_at < cutoff {
                let idle = Utc::now() - node.updated_at;
                insights.push(
                    Insight::new(
                        &self.definition.id,
                        InsightKind::Signal(SignalPayload {
                            signal: SignalKind::Staleness,
                            strength: 0.6,
                            evidence: vec![format!(
                                "no activity on {} for {} minutes",
                                node.id,
                                idle.num_minutes()
                            )],
                        }),
                        Target::new(TargetSubject::Context, Scope::Node(node.id.clone())),
                    )
                    .with_confidence(0.65)
                    .with_rationale("node untouched beyond the analysis window"),
                );
            }
        }

        let total_links: usize = input.topology.iter().map(|n| n.link_count).sum();
        let density = total_links as f64 / input.topology.len() as f64;
        insights.push(
            Insight::new(
                &self.definition.id,
                InsightKind::Enrichment(EnrichmentPayload {
                    attribute: "link_density".to_string(),
                    value: serde_json::json!(density),
                }),
                Target::new(TargetSubject::Context, Scope::Universe),
            )
            .with_confidence(0.9)
            .with_rationale("aggregate link count per topology node"),
        );

        Ok(insights)
    }
}
