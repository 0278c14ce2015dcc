//! Dimension drift agent
//!
//! Flags nodes whose dimension readings are falling, and recommends a
//! review when a reading has dropped far enough.

use crate::contract::{AgentError, AnalysisAgent};
use crate::definition::{AgentDefinition, EmitKind, Facet};
use crate::input::AgentInput;
use bureau_context::{DimensionSnapshot, Trend};
use bureau_insight::{
    Effort, Insight, InsightKind, RecommendationPayload, SignalKind, SignalPayload, Target,
    Urgency,
};

/// Readings at or below this level trigger a review recommendation
const REVIEW_FLOOR: f64 = 0.3;

/// Detects falling dimensions across the workspace
#[derive(Debug)]
pub struct DimensionDriftAgent {
    definition: AgentDefinition,
}

impl DimensionDriftAgent {
    /// Create the agent
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: AgentDefinition::new("dimension-drift", "Dimension drift analysis")
                .observes(&[Facet::Dimensions])
                .emits(&[EmitKind::Signal, EmitKind::Recommendation])
                .with_priority(20),
        }
    }

    /// The lowest reading in a snapshot, if any
    fn weakest(snapshot: &DimensionSnapshot) -> Option<(&str, f64)> {
        snapshot
            .values
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, value)| (name.as_str(), *value))
    }
}

impl Default for DimensionDriftAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for DimensionDriftAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        let mut insights = Vec::new();

        // Deterministic output order regardless of map iteration order.
        let mut falling: Vec<&DimensionSnapshot> = input
            .dimensions
            .values()
            .filter(|s| s.trend == Trend::Falling)
            .collect();
        falling.sort_by(|a, b| a.node.cmp(&b.node));

        for snapshot in falling {
            let Some((dimension, value)) = Self::weakest(snapshot) else {
                continue;
            };
            let shortfall = 1.0 - value;

            let signal = Insight::new(
                &self.definition.id,
                InsightKind::Signal(SignalPayload {
                    signal: SignalKind::Drift,
                    strength: shortfall,
                    evidence: vec![format!(
                        "{dimension} at {value:.2} and falling on {}",
                        snapshot.node
                    )],
                }),
                Target::dimension(dimension, snapshot.node.clone()),
            )
            .with_confidence(0.55 + 0.4 * shortfall)
            .with_rationale("dimension trending down across the window");

            let signal_id = signal.id;
            let needs_review = value <= REVIEW_FLOOR;
            insights.push(signal);

            if needs_review {
                insights.push(
                    Insight::new(
                        &self.definition.id,
                        InsightKind::Recommendation(RecommendationPayload {
                            action: format!("review {}", snapshot.node),
                            expected_impact: format!("arrest the {dimension} decline"),
                            effort: Effort::Moderate,
                        }),
                        Target::dimension(dimension, snapshot.node.clone()),
                    )
                    .with_confidence(0.7)
                    .with_urgency(Urgency::High)
                    .caused_by(signal_id),
                );
            }
        }

        Ok(insights)
    }
}
