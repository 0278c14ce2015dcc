//! Testing utilities for the Bureau workspace
//!
//! Shared fixtures and scripted agents for exercising the engine without
//! real heuristics.

#![allow(missing_docs)]

use bureau_agents::{AgentDefinition, AgentError, AgentInput, AnalysisAgent, Facet};
use bureau_context::{
    ContextSnapshot, DimensionSnapshot, SnapshotSet, TimelineEvent, TimelineEventKind,
    TopologyNode, Trend,
};
use bureau_insight::{
    ExecutionPlan, Insight, InsightKind, ProposalKind, ProposalPayload, ProposedChange,
    SignalKind, SignalPayload, Target, ORCHESTRATION_PLAN_PATH,
};
use parking_lot::Mutex;
use std::time::Duration;

/// A fully-populated snapshot set: context, two dimension snapshots, three
/// topology nodes, and a short timeline.
pub fn sample_snapshots() -> SnapshotSet {
    SnapshotSet::new()
        .with_context(ContextSnapshot::now())
        .with_dimensions(
            DimensionSnapshot::new("projects.bureau")
                .with_value("momentum", 0.7)
                .with_value("clarity", 0.5),
        )
        .with_dimensions(
            DimensionSnapshot::new("inbox")
                .with_value("load", 0.2)
                .with_trend(Trend::Falling),
        )
        .with_node(TopologyNode::new("projects.bureau", "Bureau", "work").with_links(5))
        .with_node(TopologyNode::new("inbox", "Inbox", "work").with_links(2))
        .with_node(TopologyNode::new("reading", "Reading list", "personal"))
        .with_event(TimelineEvent::new(TimelineEventKind::Capture).on_node("inbox"))
        .with_event(TimelineEvent::new(TimelineEventKind::Edit).on_node("projects.bureau"))
        .with_event(TimelineEvent::new(TimelineEventKind::FocusShift))
}

/// A signal insight with the given producer and confidence.
pub fn signal_insight(agent: &str, confidence: f64) -> Insight {
    Insight::new(
        agent,
        InsightKind::Signal(SignalPayload {
            signal: SignalKind::Anomaly,
            strength: confidence,
            evidence: vec!["scripted".to_string()],
        }),
        Target::orchestration(),
    )
    .with_confidence(confidence)
}

/// Returns pre-baked insights on every invocation.
pub struct FixedAgent {
    definition: AgentDefinition,
    insights: Vec<Insight>,
}

impl FixedAgent {
    pub fn new(id: &str, insights: Vec<Insight>) -> Self {
        Self {
            definition: AgentDefinition::new(id, id),
            insights,
        }
    }

    /// Emits `count` default-confidence signals attributed to `id`.
    pub fn emitting(id: &str, count: usize) -> Self {
        let insights = (0..count).map(|_| signal_insight(id, 0.7)).collect();
        Self::new(id, insights)
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for FixedAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        Ok(self.insights.clone())
    }
}

/// Records every invocation and the prior-insight count it observed.
pub struct CountingAgent {
    definition: AgentDefinition,
    seen_prior: Mutex<Vec<usize>>,
    emit: Vec<Insight>,
}

impl CountingAgent {
    pub fn new(id: &str) -> Self {
        Self {
            definition: AgentDefinition::new(id, id),
            seen_prior: Mutex::new(Vec::new()),
            emit: Vec::new(),
        }
    }

    /// Also emit the given insights on every invocation.
    #[must_use]
    pub fn emitting(mut self, insights: Vec<Insight>) -> Self {
        self.emit = insights;
        self
    }

    /// Number of times the agent has been invoked.
    pub fn invocations(&self) -> usize {
        self.seen_prior.lock().len()
    }

    /// Prior-insight counts observed per invocation, in order.
    pub fn seen_prior(&self) -> Vec<usize> {
        self.seen_prior.lock().clone()
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for CountingAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        self.seen_prior.lock().push(input.prior_insights.len());
        Ok(self.emit.clone())
    }
}

/// Fails on every invocation.
pub struct FailingAgent {
    definition: AgentDefinition,
}

impl FailingAgent {
    pub fn new(id: &str) -> Self {
        Self {
            definition: AgentDefinition::new(id, id),
        }
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for FailingAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        Err(AgentError::Analysis("scripted failure".to_string()))
    }
}

/// Sleeps before emitting one insight; for timeout scenarios.
pub struct SlowAgent {
    definition: AgentDefinition,
    delay: Duration,
}

impl SlowAgent {
    pub fn new(id: &str, delay: Duration) -> Self {
        Self {
            definition: AgentDefinition::new(id, id),
            delay,
        }
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for SlowAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![signal_insight(&self.definition.id, 0.9)])
    }
}

/// Emits a methodology-switch proposal carrying the given plan.
pub struct PlanAgent {
    definition: AgentDefinition,
    plan: ExecutionPlan,
}

impl PlanAgent {
    pub fn new(id: &str, plan: ExecutionPlan) -> Self {
        Self {
            definition: AgentDefinition::new(id, id)
                .observes(&[Facet::PriorInsights])
                .plan_capable(),
            plan,
        }
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for PlanAgent {
    fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    async fn analyze(&self, _input: &AgentInput) -> Result<Vec<Insight>, AgentError> {
        let value = self
            .plan
            .to_change_value()
            .map_err(|e| AgentError::InvalidOutput(e.to_string()))?;
        Ok(vec![Insight::new(
            &self.definition.id,
            InsightKind::Proposal(ProposalPayload {
                proposal: ProposalKind::MethodologySwitch,
                changes: vec![ProposedChange::new(
                    ORCHESTRATION_PLAN_PATH,
                    value,
                    "scripted plan",
                )],
            }),
            Target::orchestration(),
        )
        .with_confidence(0.95)])
    }
}
