//! Execution plans
//!
//! A plan is data, not code: an ordered list of stages, each naming the
//! agents to run concurrently, an optional timeout, and an optional
//! continue-condition. Plans are produced by a plan-capable agent inside a
//! proposal change and interpreted generically by the engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ulid::Ulid;

use crate::insight::{Insight, InsightKind, ProposalKind};

/// Change path under which a proposal carries a recommended plan
pub const ORCHESTRATION_PLAN_PATH: &str = "orchestration.executionPlan";

/// Unique plan identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(pub Ulid);

impl PlanId {
    /// Generate new plan ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staged execution plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Plan identifier
    pub id: PlanId,
    /// Human label
    pub label: String,
    /// Ordered stages
    pub stages: Vec<PlanStage>,
}

impl ExecutionPlan {
    /// Create an empty plan
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: PlanId::new(),
            label: label.into(),
            stages: Vec::new(),
        }
    }

    /// With a stage appended
    #[inline]
    #[must_use]
    pub fn with_stage(mut self, stage: PlanStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// All agent ids named across the plan, in stage order
    #[must_use]
    pub fn agent_ids(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|s| s.agents.iter().map(String::as_str))
            .collect()
    }

    /// Decode a plan from a proposal change value
    ///
    /// # Errors
    /// Returns [`PlanError::Decode`] when the value is not a serialized plan.
    pub fn from_change_value(value: &serde_json::Value) -> Result<Self, PlanError> {
        serde_json::from_value(value.clone()).map_err(PlanError::Decode)
    }

    /// Encode the plan as a proposal change value
    ///
    /// # Errors
    /// Returns [`PlanError::Encode`] when serialization fails.
    pub fn to_change_value(&self) -> Result<serde_json::Value, PlanError> {
        serde_json::to_value(self).map_err(PlanError::Encode)
    }

    /// Extract a recommended plan from an insight, if it carries one
    ///
    /// An insight recommends a plan when it is a methodology-switch proposal
    /// whose first change targets [`ORCHESTRATION_PLAN_PATH`].
    #[must_use]
    pub fn from_insight(insight: &Insight) -> Option<Self> {
        let InsightKind::Proposal(proposal) = &insight.kind else {
            return None;
        };
        if proposal.proposal != ProposalKind::MethodologySwitch {
            return None;
        }
        let change = proposal.changes.first()?;
        if change.path != ORCHESTRATION_PLAN_PATH {
            return None;
        }
        match Self::from_change_value(&change.value) {
            Ok(plan) => Some(plan),
            Err(e) => {
                tracing::warn!(agent = %insight.agent, error = %e, "proposal carried an undecodable plan");
                None
            }
        }
    }
}

/// One stage of a plan: agents run concurrently, bounded by a timeout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStage {
    /// Stage name
    pub name: String,
    /// Agents to run concurrently
    pub agents: Vec<String>,
    /// Stage timeout; in-flight work is cancelled on expiry
    #[serde(with = "opt_timeout_ms", default)]
    pub timeout: Option<Duration>,
    /// Condition deciding whether the plan continues past this stage
    pub continue_when: Option<ContinueCondition>,
}

impl PlanStage {
    /// Create a stage running the given agents
    #[must_use]
    pub fn new(name: impl Into<String>, agents: Vec<String>) -> Self {
        Self {
            name: name.into(),
            agents,
            timeout: None,
            continue_when: None,
        }
    }

    /// With a timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// With a continue-condition
    #[inline]
    #[must_use]
    pub fn continue_when(mut self, condition: ContinueCondition) -> Self {
        self.continue_when = Some(condition);
        self
    }
}

/// Stage continue-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum ContinueCondition {
    /// Continue once every agent in the stage settled
    AllComplete,
    /// Continue once any agent in the stage settled
    AnyComplete,
    /// Continue only if the stage produced at least this many insights
    MinInsights {
        /// Minimum insight count
        min: usize,
    },
}

/// Plan encode/decode failures
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Change value was not a serialized plan
    #[error("plan decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// Plan could not be serialized
    #[error("plan encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

mod opt_timeout_ms {
    //! Serialize an optional timeout as whole milliseconds

    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        timeout: &Option<Duration>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        timeout.map(|t| t.as_millis() as u64).serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::{ProposalPayload, ProposedChange, SignalKind, SignalPayload, Target};

    fn two_stage_plan() -> ExecutionPlan {
        ExecutionPlan::new("deep-review")
            .with_stage(
                PlanStage::new(
                    "scan",
                    vec!["focus-pattern".to_string(), "dimension-drift".to_string()],
                )
                .with_timeout(Duration::from_millis(250))
                .continue_when(ContinueCondition::MinInsights { min: 1 }),
            )
            .with_stage(PlanStage::new(
                "synthesize",
                vec!["topology-health".to_string()],
            ))
    }

    #[test]
    fn plan_builder() {
        let plan = two_stage_plan();
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(
            plan.agent_ids(),
            vec!["focus-pattern", "dimension-drift", "topology-health"]
        );
    }

    #[test]
    fn plan_round_trips_through_change_value() {
        let plan = two_stage_plan();
        let value = plan.to_change_value().unwrap();
        let back = ExecutionPlan::from_change_value(&value).unwrap();

        assert_eq!(back.id, plan.id);
        assert_eq!(back.stages.len(), 2);
        assert_eq!(back.stages[0].timeout, Some(Duration::from_millis(250)));
        assert_eq!(
            back.stages[0].continue_when,
            Some(ContinueCondition::MinInsights { min: 1 })
        );
    }

    #[test]
    fn from_insight_extracts_plan() {
        let plan = two_stage_plan();
        let insight = Insight::new(
            "meta-orchestrator",
            InsightKind::Proposal(ProposalPayload {
                proposal: ProposalKind::MethodologySwitch,
                changes: vec![ProposedChange::new(
                    ORCHESTRATION_PLAN_PATH,
                    plan.to_change_value().unwrap(),
                    "switch to staged analysis",
                )],
            }),
            Target::orchestration(),
        );

        let extracted = ExecutionPlan::from_insight(&insight).unwrap();
        assert_eq!(extracted.id, plan.id);
    }

    #[test]
    fn from_insight_ignores_other_paths() {
        let insight = Insight::new(
            "meta-orchestrator",
            InsightKind::Proposal(ProposalPayload {
                proposal: ProposalKind::MethodologySwitch,
                changes: vec![ProposedChange::new(
                    "rules.review.cadence",
                    serde_json::json!("weekly"),
                    "unrelated change",
                )],
            }),
            Target::orchestration(),
        );

        assert!(ExecutionPlan::from_insight(&insight).is_none());
    }

    #[test]
    fn from_insight_ignores_non_proposals() {
        let insight = Insight::new(
            "focus-pattern",
            InsightKind::Signal(SignalPayload {
                signal: SignalKind::Momentum,
                strength: 0.9,
                evidence: vec![],
            }),
            Target::orchestration(),
        );

        assert!(ExecutionPlan::from_insight(&insight).is_none());
    }

    #[test]
    fn from_insight_rejects_undecodable_value() {
        let insight = Insight::new(
            "meta-orchestrator",
            InsightKind::Proposal(ProposalPayload {
                proposal: ProposalKind::MethodologySwitch,
                changes: vec![ProposedChange::new(
                    ORCHESTRATION_PLAN_PATH,
                    serde_json::json!({"not": "a plan"}),
                    "malformed",
                )],
            }),
            Target::orchestration(),
        );

        assert!(ExecutionPlan::from_insight(&insight).is_none());
    }
}
