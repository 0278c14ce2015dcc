//! Bureau Insight - typed agent outputs
//!
//! Defines what analysis agents produce:
//! - [`Insight`]: one immutable result with a discriminated kind
//!   (signal, recommendation, proposal, enrichment), a target, a
//!   confidence, an urgency, and a time-to-live
//! - [`ExecutionPlan`]: a staged run description, produced as data by a
//!   plan-capable agent and interpreted generically by the engine
//!
//! Insights are never edited after creation; newer insights supersede older
//! ones. The optional `caused_by` field is a non-owning back-reference for
//! lookup only.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod insight;
pub mod plan;

pub use insight::{
    Effort, EnrichmentPayload, Insight, InsightId, InsightKind, ProposalKind, ProposalPayload,
    ProposedChange, RecommendationPayload, Scope, SignalKind, SignalPayload, Target,
    TargetSubject, Urgency,
};
pub use plan::{
    ContinueCondition, ExecutionPlan, PlanError, PlanId, PlanStage, ORCHESTRATION_PLAN_PATH,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
