//! Meta orchestrator agent
//!
//! The plan source: when the snapshot warrants staged analysis, emits a
//! methodology-switch proposal whose first change carries an encoded
//! [`ExecutionPlan`] under the orchestration plan path. The engine extracts
//! and executes that plan; when this agent stays quiet, the engine falls
//! back to running every registered agent sequentially.

use crate::contract::{AgentError, AnalysisAgent};
use crate::definition::{AgentDefinition, EmitKind, Facet};
use crate::input::AgentInput;
use bureau_context::FocusMode;
use bureau_insight::{
    ContinueCondition, ExecutionPlan, Insight, InsightKind, PlanStage, ProposalKind,
    ProposalPayload, ProposedChange, Target, ORCHESTRATION_PLAN_PATH,
};
use std::time::Duration;

/// Default per-stage timeout in the recommended plan
const STAGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Emits a staged execution plan when the workspace looks turbulent
#[derive(Debug)]
pub struct MetaOrchestratorAgent {
    definition: AgentDefinition,
}

impl MetaOrchestratorAgent {
    /// Create the agent
    #[must_use]
    pub fn new() -> Self {
        Self {
            definition: AgentDefinition::new("meta-orchestrator", "Meta orchestration")
                .observes(&[Facet::Context, Facet::PriorInsights])
                .emits(&[EmitKind::Proposal])
                .with_priority(0)
                .plan_capable(),
        }
    }

    fn staged_plan() -> ExecutionPlan {
        ExecutionPlan::new("turbulence-review")
            .with_stage(
                PlanStage::new(
                    "scan",
                    vec!["focus-pattern".to_string(), "dimension-drift".to_string()],
                )
                .with_timeout(STAGE_TIMEOUT)
                .continue_when(ContinueCondition::MinInsights { min: 1 }),
            )
            .with_stage(
                PlanStage::new("synthesize", vec!["topology-health".to_string()])
                    .with_timeout(STAGE_TIMEOUT),
            )
    }
}

impl Default for MetaOrchestratorAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for MetaOrchestratorAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        let context = input
            .context
            .as_ref()
            .ok_or_else(|| AgentError::MissingInput("context".to_string()))?;

        let turbulent = context.focus.mode == FocusMode::Scattered
            || context.health.open_alerts > 0
            || context.health.overdue_items > 0;
        if !turbulent {
            return Ok(Vec::new());
        }

        let plan = Self::staged_plan();
        let value = plan
            .to_change_value()
            .map_err(|e| AgentError::InvalidOutput(e.to_string()))?;

        Ok(vec![Insight::new(
            &self.definition.id,
            InsightKind::Proposal(ProposalPayload {
                proposal: ProposalKind::MethodologySwitch,
                changes: vec![ProposedChange::new(
                    ORCHESTRATION_PLAN_PATH,
                    value,
                    "switch to staged turbulence review",
                )],
            }),
            Target::orchestration(),
        )
        .with_confidence(0.9)
        .with_rationale("workspace shows scatter or open alerts; staged analysis pays off")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_context::{ContextSnapshot, FocusState, HealthCounters, RunConfig, SnapshotSet};

    fn input_with(context: ContextSnapshot) -> AgentInput {
        AgentInput::new(
            &SnapshotSet::new().with_context(context),
            Vec::new(),
            RunConfig::new(),
        )
    }

    #[tokio::test]
    async fn calm_workspace_gets_no_plan() {
        let agent = MetaOrchestratorAgent::new();
        let insights = agent.analyze(&input_with(ContextSnapshot::now())).await.unwrap();
        assert!(insights.is_empty());
    }

    #[tokio::test]
    async fn scattered_focus_triggers_plan() {
        let agent = MetaOrchestratorAgent::new();
        let context = ContextSnapshot::now().with_focus(FocusState {
            focused_node: None,
            mode: FocusMode::Scattered,
            streak_secs: 0,
        });

        let insights = agent.analyze(&input_with(context)).await.unwrap();

        assert_eq!(insights.len(), 1);
        let plan = ExecutionPlan::from_insight(&insights[0]).expect("proposal carries a plan");
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(plan.stages[0].agents.len(), 2);
        assert_eq!(
            plan.stages[0].continue_when,
            Some(ContinueCondition::MinInsights { min: 1 })
        );
    }

    #[tokio::test]
    async fn open_alerts_trigger_plan() {
        let agent = MetaOrchestratorAgent::new();
        let context = ContextSnapshot::now().with_health(HealthCounters {
            open_alerts: 1,
            ..HealthCounters::default()
        });

        let insights = agent.analyze(&input_with(context)).await.unwrap();
        assert_eq!(insights.len(), 1);
        assert!(ExecutionPlan::from_insight(&insights[0]).is_some());
    }
}
