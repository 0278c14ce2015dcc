//! Execution reports
//!
//! One [`ExecutionReport`] per engine run: the aggregated insights, summary
//! metrics, and structured per-stage error records. Per-agent failures in
//! the bare sequential/parallel calls are log-only; plan runs record them
//! here.

use bureau_insight::{Insight, PlanId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Structured record of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Plan id (synthetic for non-plan runs)
    pub plan: PlanId,
    /// Plan label
    pub label: String,
    /// Run start timestamp
    pub started_at: DateTime<Utc>,
    /// Run end timestamp
    pub finished_at: DateTime<Utc>,
    /// Aggregated insights across all stages
    pub insights: Vec<Insight>,
    /// Summary metrics
    pub metrics: RunMetrics,
    /// Per-stage error records
    pub errors: Vec<StageError>,
}

/// Summary metrics for one run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Agent invocations dispatched (stages that never started count zero)
    pub agents_executed: usize,
    /// Insights surviving filtering and budgets
    pub insights_produced: usize,
    /// Error records collected
    pub errors: usize,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// One stage-level error record
///
/// `agent` is set for a per-agent analysis failure and `None` for a stage
/// timeout, where no single agent is at fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageError {
    /// Stage name
    pub stage: String,
    /// Failing agent, when attributable
    pub agent: Option<String>,
    /// Error text
    pub message: String,
    /// When the error was recorded
    pub at: DateTime<Utc>,
}

impl StageError {
    /// Record a per-agent failure
    #[must_use]
    pub fn agent_failure(
        stage: impl Into<String>,
        agent: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            agent: Some(agent.into()),
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Record a stage timeout
    #[must_use]
    pub fn timeout(stage: impl Into<String>, limit: Duration) -> Self {
        Self {
            stage: stage.into(),
            agent: None,
            message: format!("stage timed out after {}ms, results discarded", limit.as_millis()),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_failure_record() {
        let error = StageError::agent_failure("scan", "dimension-drift", "analysis failed");
        assert_eq!(error.stage, "scan");
        assert_eq!(error.agent.as_deref(), Some("dimension-drift"));
    }

    #[test]
    fn timeout_record_has_no_agent() {
        let error = StageError::timeout("scan", Duration::from_millis(10));
        assert!(error.agent.is_none());
        assert!(error.message.contains("10ms"));
    }

    #[test]
    fn report_serializes() {
        let report = ExecutionReport {
            plan: PlanId::new(),
            label: "test".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            insights: Vec::new(),
            metrics: RunMetrics::default(),
            errors: vec![StageError::timeout("scan", Duration::from_millis(5))],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["agent"], serde_json::Value::Null);
    }
}
