//! Focus pattern agent
//!
//! Watches the timeline and focus state for attention patterns: scattered
//! switching (fragmentation) and sustained deep focus (momentum).

use crate::contract::{AgentError, AnalysisAgent};
use crate::definition::{AgentDefinition, EmitKind, Facet};
use crate::input::AgentInput;
use bureau_insight::{
    Effort, Insight, InsightKind, RecommendationPayload, Scope, SignalKind, SignalPayload, Target,
    TargetSubject, Urgency,
};
use bureau_context::{FocusMode, TimelineEventKind};

/// Focus shifts below this count never register as fragmentation
const FRAGMENTATION_MIN_SHIFTS: usize = 3;

/// Fraction of timeline events that must be focus shifts
const FRAGMENTATION_MIN_RATIO: f64 = 0.4;

/// Deep-focus streak length that counts as momentum
const MOMENTUM_STREAK_SECS: u64 = 1500;

/// Detects fragmentation and momentum in the focus timeline
#[derive(Debug)]
pub struct FocusPatternAgent {
    definition: AgentDefinition,
}

impl FocusPatternAgent {
    /// Create the agent
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: AgentDefinition::new("focus-pattern", "Focus pattern analysis")
                .observes(&[Facet::Context, Facet::Timeline])
                .emits(&[EmitKind::Signal, EmitKind::Recommendation])
                .with_priority(10),
        }
    }
}

impl Default for FocusPatternAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for FocusPatternAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        let context = input
            .context
            .as_ref()
            .ok_or_else(|| AgentError::MissingInput("context".to_string()))?;

        let mut insights = Vec::new();

        let shifts = input
            .timeline
            .iter()
            .filter(|e| e.kind == TimelineEventKind::FocusShift)
            .count();
        let ratio = shifts as f64 / input.timeline.len() as f64;

        if shifts >= FRAGMENTATION_MIN_SHIFTS && ratio >= FRAGMENTATION_MIN_RATIO {
            let signal = Insight::new(
                &self.definition.id,
                InsightKind::Signal(SignalPayload {
                    signal: SignalKind::Fragmentation,
                    strength: ratio.min(1.0),
                    evidence: vec![format!(
                        "{shifts} focus shifts across {} timeline events",
                        input.timeline.len()
                    )],
                }),
                Target::new(TargetSubject::Context, Scope::Session),
            )
            .with_confidence(0.5 + ratio / 2.0)
            .with_rationale("attention is scattering across nodes")
            .with_urgency(Urgency::High);

            let recommendation = Insight::new(
                &self.definition.id,
                InsightKind::Recommendation(RecommendationPayload {
                    action: "timebox a single node for the next block".to_string(),
                    expected_impact: "fewer context switches, restored streak".to_string(),
                    effort: Effort::Trivial,
                }),
                Target::new(TargetSubject::Context, Scope::Session),
            )
            .with_confidence(0.6)
            .caused_by(signal.id);

            insights.push(signal);
            insights.push(recommendation);
        }

        if context.focus.mode == FocusMode::Deep && context.focus.streak_secs >= MOMENTUM_STREAK_SECS
        {
            let scope = match &context.focus.focused_node {
                Some(node) => Scope::Node(node.clone()),
                None => Scope::Session,
            };
            insights.push(
                Insight::new(
                    &self.definition.id,
                    InsightKind::Signal(SignalPayload {
                        signal: SignalKind::Momentum,
                        strength: (context.focus.streak_secs as f64 / 3600.0).min(1.0),
                        evidence: vec![format!(
                            "deep focus streak of {}s",
                            context.focus.streak_secs
                        )],
                    }),
                    Target::new(TargetSubject::Context, scope),
                )
                .with_confidence(0.8)
                .with_rationale("sustained deep focus on one node"),
            );
        }

        Ok(insights)
    }
}
