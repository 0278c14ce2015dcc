//! Insight type and payloads
//!
//! An [`Insight`] is one structured result from an analysis agent. The kind
//! is a tagged union matched exhaustively; there is no stringly-typed
//! discrimination anywhere in the workspace.

use bureau_context::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ulid::Ulid;

/// Default confidence applied when an agent does not set one
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Default time-to-live applied when an agent does not set one
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Unique insight identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InsightId(pub Ulid);

impl InsightId {
    /// Generate new insight ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for InsightId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InsightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One structured analysis result
///
/// Immutable once created. Confidence is clamped to [0,1] at construction,
/// so downstream filtering can rely on the bound without re-checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Insight identifier
    pub id: InsightId,
    /// Id of the producing agent
    pub agent: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Discriminated payload
    pub kind: InsightKind,
    /// What the insight concerns
    pub target: Target,
    /// Confidence in [0,1]
    pub confidence: f64,
    /// Free-text rationale
    pub rationale: String,
    /// Urgency rank
    pub urgency: Urgency,
    /// Time-to-live
    #[serde(with = "ttl_secs")]
    pub ttl: Duration,
    /// Non-owning back-reference to the insight that caused this one
    pub caused_by: Option<InsightId>,
}

impl Insight {
    /// Create an insight with standard defaults
    ///
    /// Defaults: confidence 0.7, generic rationale, normal urgency, 5-minute
    /// TTL, fresh id.
    #[must_use]
    pub fn new(agent: impl Into<String>, kind: InsightKind, target: Target) -> Self {
        Self {
            id: InsightId::new(),
            agent: agent.into(),
            created_at: Utc::now(),
            kind,
            target,
            confidence: DEFAULT_CONFIDENCE,
            rationale: "derived from current workspace state".to_string(),
            urgency: Urgency::Normal,
            ttl: DEFAULT_TTL,
            caused_by: None,
        }
    }

    /// With confidence, clamped to [0,1]
    #[inline]
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// With rationale
    #[inline]
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// With urgency
    #[inline]
    #[must_use]
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// With time-to-live
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// With a back-reference to the causing insight
    #[inline]
    #[must_use]
    pub fn caused_by(mut self, id: InsightId) -> Self {
        self.caused_by = Some(id);
        self
    }

    /// Whether the insight has outlived its TTL at `now`
    #[must_use]
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => self.created_at + ttl < now,
            Err(_) => false,
        }
    }
}

/// Discriminated insight payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightKind {
    /// Observation about current state
    Signal(SignalPayload),
    /// Suggested user action
    Recommendation(RecommendationPayload),
    /// Structured change proposal
    Proposal(ProposalPayload),
    /// Derived attribute attached to a target
    Enrichment(EnrichmentPayload),
}

/// Signal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPayload {
    /// Signal classification
    pub signal: SignalKind,
    /// Signal strength in [0,1]
    pub strength: f64,
    /// Supporting evidence lines
    pub evidence: Vec<String>,
}

/// Signal classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Reading outside its expected band
    Anomaly,
    /// Sustained decline in a dimension
    Drift,
    /// Sustained improvement in a dimension
    Momentum,
    /// Attention scattered across nodes
    Fragmentation,
    /// Node untouched beyond the window
    Staleness,
}

/// Recommendation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPayload {
    /// Suggested action
    pub action: String,
    /// Expected impact of taking the action
    pub expected_impact: String,
    /// Effort estimate
    pub effort: Effort,
}

/// Effort estimate for a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    /// Under a minute
    Trivial,
    /// A focused block
    #[default]
    Moderate,
    /// A planning-level commitment
    Substantial,
}

/// Proposal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalPayload {
    /// Proposal classification
    pub proposal: ProposalKind,
    /// Ordered structured changes
    pub changes: Vec<ProposedChange>,
}

/// Proposal classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    /// Switch how analysis itself is run
    MethodologySwitch,
    /// Change a workspace rule
    RuleChange,
    /// Reorder priorities
    PriorityShift,
}

/// One structured change inside a proposal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedChange {
    /// Dotted path the change targets
    pub path: String,
    /// New value at the path
    pub value: serde_json::Value,
    /// Human summary of the change
    pub summary: String,
}

impl ProposedChange {
    /// Create a change
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        value: serde_json::Value,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            value,
            summary: summary.into(),
        }
    }
}

/// Enrichment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    /// Attribute name
    pub attribute: String,
    /// Attribute value
    pub value: serde_json::Value,
}

/// What an insight concerns, qualified by scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Subject of the insight
    pub subject: TargetSubject,
    /// Scope qualifier
    pub scope: Scope,
}

impl Target {
    /// Create a target
    #[inline]
    #[must_use]
    pub fn new(subject: TargetSubject, scope: Scope) -> Self {
        Self { subject, scope }
    }

    /// Orchestration target at session scope
    #[inline]
    #[must_use]
    pub fn orchestration() -> Self {
        Self::new(TargetSubject::Orchestration, Scope::Session)
    }

    /// Dimension target scoped to a node
    #[inline]
    #[must_use]
    pub fn dimension(name: impl Into<String>, node: impl Into<NodeId>) -> Self {
        Self::new(TargetSubject::Dimension(name.into()), Scope::Node(node.into()))
    }
}

/// Target subjects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSubject {
    /// A named dimension
    Dimension(String),
    /// The priority ordering
    Priorities,
    /// A named workspace rule
    Rule(String),
    /// A named methodology
    Methodology(String),
    /// General ambient context
    Context,
    /// The orchestration machinery itself
    Orchestration,
}

/// Scope qualifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// A single node
    Node(NodeId),
    /// A sphere of nodes
    Sphere(String),
    /// The whole workspace
    Universe,
    /// The current session
    Session,
}

/// Urgency ranks, ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Can wait indefinitely
    Low,
    /// Default rank
    #[default]
    Normal,
    /// Should be surfaced soon
    High,
    /// Needs immediate attention
    Critical,
}

mod ttl_secs {
    //! Serialize a TTL as whole seconds

    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(ttl: &Duration, s: S) -> Result<S::Ok, S::Error> {
        ttl.as_secs().serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn signal(strength: f64) -> InsightKind {
        InsightKind::Signal(SignalPayload {
            signal: SignalKind::Drift,
            strength,
            evidence: vec!["momentum fell 3 samples running".to_string()],
        })
    }

    #[test]
    fn insight_defaults() {
        let insight = Insight::new("dimension-drift", signal(0.6), Target::orchestration());

        assert_eq!(insight.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(insight.urgency, Urgency::Normal);
        assert_eq!(insight.ttl, DEFAULT_TTL);
        assert!(insight.caused_by.is_none());
        assert!(!insight.rationale.is_empty());
    }

    #[test]
    fn insight_ids_unique() {
        let a = Insight::new("a", signal(0.1), Target::orchestration());
        let b = Insight::new("a", signal(0.1), Target::orchestration());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn confidence_clamped() {
        let high = Insight::new("a", signal(0.5), Target::orchestration()).with_confidence(1.7);
        let low = Insight::new("a", signal(0.5), Target::orchestration()).with_confidence(-0.3);

        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn caused_by_back_reference() {
        let cause = Insight::new("a", signal(0.5), Target::orchestration());
        let effect = Insight::new("b", signal(0.5), Target::orchestration()).caused_by(cause.id);

        assert_eq!(effect.caused_by, Some(cause.id));
    }

    #[test]
    fn expiry_uses_ttl() {
        let insight = Insight::new("a", signal(0.5), Target::orchestration())
            .with_ttl(Duration::from_secs(60));

        let later = insight.created_at + chrono::Duration::seconds(61);
        let sooner = insight.created_at + chrono::Duration::seconds(30);

        assert!(insight.expired_at(later));
        assert!(!insight.expired_at(sooner));
    }

    #[test]
    fn kind_serde_tagged() {
        let insight = Insight::new(
            "topology-health",
            InsightKind::Enrichment(EnrichmentPayload {
                attribute: "link_density".to_string(),
                value: serde_json::json!(0.42),
            }),
            Target::new(TargetSubject::Context, Scope::Universe),
        );

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"]["kind"], "enrichment");

        let back: Insight = serde_json::from_value(json).unwrap();
        match back.kind {
            InsightKind::Enrichment(e) => assert_eq!(e.attribute, "link_density"),
            other => panic!("expected enrichment, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn confidence_always_in_bounds(raw in -10.0f64..10.0) {
            let insight = Insight::new("p", signal(0.5), Target::orchestration())
                .with_confidence(raw);
            prop_assert!((0.0..=1.0).contains(&insight.confidence));
        }
    }
}
