//! Bureau Engine - agent orchestration
//!
//! The orchestration core of the Bureau shell:
//! - runs one or many analysis agents against a frozen snapshot set under
//!   sequential, parallel, or staged-plan policies
//! - isolates every agent failure at the invocation boundary
//! - extracts and executes plans recommended by a plan-capable agent
//! - keeps a bounded rolling history of produced insights
//! - returns structured execution reports with per-stage error records
//!
//! # Example
//!
//! ```rust,ignore
//! use bureau_agents::AgentRegistry;
//! use bureau_context::SnapshotSet;
//! use bureau_engine::{EngineConfig, InsightEngine};
//!
//! # async fn example() {
//! let engine = InsightEngine::new(AgentRegistry::with_defaults(), EngineConfig::new());
//! let report = engine.run_all(&SnapshotSet::new()).await;
//! println!("{} insights", report.metrics.insights_produced);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod report;

pub use engine::{EngineConfig, InsightEngine};
pub use report::{ExecutionReport, RunMetrics, StageError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
