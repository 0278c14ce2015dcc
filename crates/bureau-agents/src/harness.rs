//! The execution template
//!
//! [`execute`] wraps every agent invocation identically, whatever the
//! agent's internal logic:
//! 1. validate readiness against the agent's declared facets
//! 2. invoke the analysis
//! 3. filter by the run's confidence threshold
//! 4. truncate to the run's insight budget, preserving production order
//! 5. log produced/kept counts
//!
//! Being a free function over `&dyn AnalysisAgent` (rather than an
//! overridable trait method) keeps the template impossible to bypass from
//! inside an agent implementation.

use crate::contract::{AgentError, AnalysisAgent};
use crate::definition::{AgentDefinition, Facet};
use crate::input::AgentInput;
use bureau_insight::Insight;

/// Declared facets absent from the input bundle
///
/// `Context` requires the snapshot to be present; `Dimensions`, `Topology`,
/// and `Timeline` require their collections to be non-empty;
/// `PriorInsights` is always satisfied.
#[must_use]
pub fn missing_facets(definition: &AgentDefinition, input: &AgentInput) -> Vec<Facet> {
    definition
        .observes
        .iter()
        .copied()
        .filter(|facet| !facet_present(*facet, input))
        .collect()
}

fn facet_present(facet: Facet, input: &AgentInput) -> bool {
    match facet {
        Facet::Context => input.context.is_some(),
        Facet::Dimensions => !input.dimensions.is_empty(),
        Facet::Topology => !input.topology.is_empty(),
        Facet::Timeline => !input.timeline.is_empty(),
        Facet::PriorInsights => true,
    }
}

/// Run one agent through the template
///
/// Returns `Ok(vec![])` without invoking the analysis when a declared facet
/// is missing. Analysis errors propagate to the caller; the engine traps
/// them at its invocation boundary.
///
/// # Errors
/// Whatever the agent's `analyze` raises.
pub async fn execute(
    agent: &dyn AnalysisAgent,
    input: &AgentInput,
) -> Result<Vec<Insight>, AgentError> {
    let definition = agent.definition();

    let missing = missing_facets(definition, input);
    if !missing.is_empty() {
        tracing::debug!(
            agent = %definition.id,
            missing = ?missing,
            "declared facets missing, analysis skipped"
        );
        return Ok(Vec::new());
    }

    let produced = agent.analyze(input).await?;
    let produced_count = produced.len();

    let threshold = input.config.confidence_threshold;
    let mut kept: Vec<Insight> = produced
        .into_iter()
        .filter(|insight| insight.confidence >= threshold)
        .collect();
    let below_threshold = produced_count - kept.len();

    kept.truncate(input.config.max_insights);

    tracing::debug!(
        agent = %definition.id,
        produced = produced_count,
        below_threshold,
        kept = kept.len(),
        "agent invocation complete"
    );

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::EmitKind;
    use bureau_context::{ContextSnapshot, RunConfig, SnapshotSet, TimelineEvent, TimelineEventKind};
    use bureau_insight::{InsightKind, SignalKind, SignalPayload, Target};

    /// Emits a fixed ladder of confidences: 0.9, 0.7, 0.5, 0.3
    struct LadderAgent {
        definition: AgentDefinition,
    }

    impl LadderAgent {
        fn new(observes: &[Facet]) -> Self {
            Self {
                definition: AgentDefinition::new("ladder", "Ladder")
                    .observes(observes)
                    .emits(&[EmitKind::Signal]),
            }
        }
    }

    #[async_trait::async_trait]
    impl AnalysisAgent for LadderAgent {
        fn definition(&self) -> &AgentDefinition {
            &self.definition
        }

        async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
            Ok([0.9, 0.7, 0.5, 0.3]
                .into_iter()
                .map(|confidence| {
                    Insight::new(
                        "ladder",
                        InsightKind::Signal(SignalPayload {
                            signal: SignalKind::Anomaly,
                            strength: confidence,
                            evidence: vec![],
                        }),
                        Target::orchestration(),
                    )
                    .with_confidence(confidence)
                })
                .collect())
        }
    }

    struct FailingAgent {
        definition: AgentDefinition,
    }

    #[async_trait::async_trait]
    impl AnalysisAgent for FailingAgent {
        fn definition(&self) -> &AgentDefinition {
            &self.definition
        }

        async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
            Err(AgentError::Analysis("synthetic failure".to_string()))
        }
    }

    fn populated_input(config: RunConfig) -> AgentInput {
        let snapshots = SnapshotSet::new()
            .with_context(ContextSnapshot::now())
            .with_event(TimelineEvent::new(TimelineEventKind::Capture));
        AgentInput::new(&snapshots, Vec::new(), config)
    }

    #[tokio::test]
    async fn filters_below_threshold() {
        let agent = LadderAgent::new(&[Facet::Context]);
        let input = populated_input(RunConfig::new().with_threshold(0.6));

        let kept = execute(&agent, &input).await.unwrap();

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|i| i.confidence >= 0.6));
    }

    #[tokio::test]
    async fn truncates_to_budget_preserving_order() {
        let agent = LadderAgent::new(&[Facet::Context]);
        let input = populated_input(RunConfig::new().with_threshold(0.0).with_max_insights(2));

        let kept = execute(&agent, &input).await.unwrap();

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.7);
    }

    #[tokio::test]
    async fn skips_analysis_when_facet_missing() {
        let agent = LadderAgent::new(&[Facet::Dimensions]);
        // No dimensions in the bundle
        let input = populated_input(RunConfig::new());

        let kept = execute(&agent, &input).await.unwrap();
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn prior_insights_facet_never_fails() {
        let agent = LadderAgent::new(&[Facet::PriorInsights]);
        let input = AgentInput::new(&SnapshotSet::new(), Vec::new(), RunConfig::new());

        let kept = execute(&agent, &input).await.unwrap();
        assert_eq!(kept.len(), 3); // 0.9, 0.7, 0.5 clear the default 0.5
    }

    #[tokio::test]
    async fn missing_facets_reports_all_absent() {
        let agent = LadderAgent::new(&[Facet::Context, Facet::Dimensions, Facet::Topology]);
        let input = AgentInput::new(&SnapshotSet::new(), Vec::new(), RunConfig::new());

        let missing = missing_facets(agent.definition(), &input);
        assert_eq!(missing, vec![Facet::Context, Facet::Dimensions, Facet::Topology]);
    }

    #[tokio::test]
    async fn analysis_errors_propagate() {
        let agent = FailingAgent {
            definition: AgentDefinition::new("failing", "Failing"),
        };
        let input = populated_input(RunConfig::new());

        let result = execute(&agent, &input).await;
        assert!(matches!(result, Err(AgentError::Analysis(_))));
    }
}
