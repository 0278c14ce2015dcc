//! The orchestration engine
//!
//! [`InsightEngine`] dispatches analysis agents against a frozen snapshot
//! set under three policies:
//! - sequential: strict order, each agent sees the outputs of all earlier
//!   agents in the same run
//! - parallel: one shared input bundle, agents jointly awaited
//! - staged plan: per-stage concurrency, timeouts with real cancellation,
//!   and continue-conditions
//!
//! Agent failures never cross the invocation boundary: an erroring or
//! panicking agent yields an empty result and a log line (plus a structured
//! error record inside plan runs). A stage timeout is the one failure mode
//! that discards otherwise-successful work; bounded latency wins over
//! completeness there.

use crate::report::{ExecutionReport, RunMetrics, StageError};
use bureau_agents::{harness, AgentInput, AgentRegistry, AnalysisAgent};
use bureau_context::{RunConfig, SnapshotSet};
use bureau_insight::{ContinueCondition, ExecutionPlan, Insight, PlanId};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Default history buffer capacity
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// History buffer capacity; oldest insights are evicted first
    pub max_history: usize,
    /// Run configuration handed to every input bundle
    pub run: RunConfig,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With history capacity
    #[inline]
    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// With run configuration
    #[inline]
    #[must_use]
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            run: RunConfig::default(),
        }
    }
}

/// The orchestration engine
///
/// Owns the agent registry and the bounded insight history. All run methods
/// take `&self`; the history sits behind a mutex that is only touched
/// between agent invocations, never while agents are in flight.
pub struct InsightEngine {
    registry: AgentRegistry,
    config: EngineConfig,
    history: Mutex<VecDeque<Insight>>,
}

impl InsightEngine {
    /// Create an engine over a registry
    #[must_use]
    pub fn new(registry: AgentRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Engine with the built-in agents and default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(AgentRegistry::with_defaults(), EngineConfig::new())
    }

    /// The registry this engine dispatches to
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Defensive copy of the insight history, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<Insight> {
        self.history.lock().iter().cloned().collect()
    }

    /// Run a single agent
    ///
    /// Unknown ids and agent failures both yield an empty list; neither is
    /// an error to the caller.
    pub async fn run_agent(&self, id: &str, snapshots: &SnapshotSet) -> Vec<Insight> {
        let Some(agent) = self.registry.get(id) else {
            tracing::warn!(agent = id, "unknown agent requested");
            return Vec::new();
        };

        // Single-agent runs start from a clean slate: no prior insights.
        let input = AgentInput::new(snapshots, Vec::new(), self.config.run.clone());
        let insights = match Self::invoke(agent, input).await {
            Ok(insights) => insights,
            Err(message) => {
                tracing::warn!(agent = id, error = %message, "agent failed, returning empty");
                Vec::new()
            }
        };

        self.record(&insights);
        insights
    }

    /// Run agents in order, accumulating context
    ///
    /// Agent *k* sees the engine history followed by the outputs of agents
    /// `1..k-1` from this run. A failing agent is skipped; the rest of the
    /// sequence still runs.
    pub async fn run_sequential(&self, ids: &[String], snapshots: &SnapshotSet) -> Vec<Insight> {
        let history = self.history();
        let base = AgentInput::new(snapshots, Vec::new(), self.config.run.clone());

        let mut accumulated: Vec<Insight> = Vec::new();
        for id in ids {
            let Some(agent) = self.registry.get(id) else {
                tracing::warn!(agent = %id, "unknown agent in sequence, skipping");
                continue;
            };

            let mut prior = history.clone();
            prior.extend(accumulated.iter().cloned());
            let input = base.with_prior(prior);

            match Self::invoke(agent, input).await {
                Ok(insights) => accumulated.extend(insights),
                Err(message) => {
                    tracing::warn!(agent = %id, error = %message, "agent failed, sequence continues");
                }
            }
        }

        self.record(&accumulated);
        accumulated
    }

    /// Run agents concurrently over one shared input bundle
    ///
    /// Agents do not see each other's outputs; every bundle carries the
    /// engine history only. The flattened result groups insights by agent
    /// in input order.
    pub async fn run_parallel(&self, ids: &[String], snapshots: &SnapshotSet) -> Vec<Insight> {
        let input = AgentInput::new(snapshots, self.history(), self.config.run.clone());

        let mut spawned = Vec::new();
        for id in ids {
            match self.registry.get(id) {
                Some(agent) => {
                    let input = input.clone();
                    spawned.push((id.clone(), tokio::spawn(Self::invoke_raw(agent, input))));
                }
                None => tracing::warn!(agent = %id, "unknown agent in batch, skipping"),
            }
        }

        let (names, handles): (Vec<_>, Vec<_>) = spawned.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        let mut flattened = Vec::new();
        for (id, result) in names.into_iter().zip(results) {
            match Self::flatten(result) {
                Ok(insights) => flattened.extend(insights),
                Err(message) => {
                    tracing::warn!(agent = %id, error = %message, "agent failed in batch");
                }
            }
        }

        self.record(&flattened);
        flattened
    }

    /// Execute a staged plan
    ///
    /// Each stage's bundle carries the history plus the outputs of all
    /// previously completed stages. Stage timeouts abort in-flight agents
    /// and discard the whole stage. A `MinInsights` continue-condition that
    /// is not met stops the plan; later stages never start.
    pub async fn run_plan(&self, plan: &ExecutionPlan, snapshots: &SnapshotSet) -> ExecutionReport {
        let started_at = Utc::now();
        let started = Instant::now();
        tracing::info!(plan = %plan.id, label = %plan.label, stages = plan.stages.len(), "plan run starting");

        let history = self.history();
        let base = AgentInput::new(snapshots, Vec::new(), self.config.run.clone());

        let mut aggregated: Vec<Insight> = Vec::new();
        let mut errors: Vec<StageError> = Vec::new();
        let mut agents_executed = 0;

        for stage in &plan.stages {
            let mut prior = history.clone();
            prior.extend(aggregated.iter().cloned());
            let input = base.with_prior(prior);

            let handles: Vec<(String, Option<JoinHandle<Result<Vec<Insight>, String>>>)> = stage
                .agents
                .iter()
                .map(|id| {
                    let handle = self.registry.get(id).map(|agent| {
                        let input = input.clone();
                        tokio::spawn(Self::invoke_raw(agent, input))
                    });
                    (id.clone(), handle)
                })
                .collect();
            agents_executed += stage.agents.len();

            let abort_handles: Vec<_> = handles
                .iter()
                .filter_map(|(_, h)| h.as_ref().map(JoinHandle::abort_handle))
                .collect();

            let settle = Self::settle_stage(&stage.name, handles);
            let produced = match stage.timeout {
                Some(limit) => match tokio::time::timeout(limit, settle).await {
                    Ok((insights, stage_errors)) => {
                        errors.extend(stage_errors);
                        let produced = insights.len();
                        aggregated.extend(insights);
                        produced
                    }
                    Err(_) => {
                        // Cancel in-flight work rather than letting it burn
                        // in the background with its results discarded.
                        for handle in &abort_handles {
                            handle.abort();
                        }
                        tracing::warn!(stage = %stage.name, timeout_ms = limit.as_millis() as u64, "stage timed out, results discarded");
                        errors.push(StageError::timeout(&stage.name, limit));
                        0
                    }
                },
                None => {
                    let (insights, stage_errors) = settle.await;
                    errors.extend(stage_errors);
                    let produced = insights.len();
                    aggregated.extend(insights);
                    produced
                }
            };

            if let Some(ContinueCondition::MinInsights { min }) = stage.continue_when {
                if produced < min {
                    tracing::info!(
                        stage = %stage.name,
                        produced,
                        min,
                        "continue-condition not met, plan stopped"
                    );
                    break;
                }
            }
        }

        self.record(&aggregated);

        let metrics = RunMetrics {
            agents_executed,
            insights_produced: aggregated.len(),
            errors: errors.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(plan = %plan.id, ?metrics, "plan run complete");

        ExecutionReport {
            plan: plan.id,
            label: plan.label.clone(),
            started_at,
            finished_at: Utc::now(),
            insights: aggregated,
            metrics,
            errors,
        }
    }

    /// Ask the plan source for a recommended plan
    ///
    /// Returns `None` when no plan-capable agent is registered, the agent
    /// fails, or its proposal does not carry a decodable plan.
    pub async fn recommended_plan(&self, snapshots: &SnapshotSet) -> Option<ExecutionPlan> {
        let source = self.registry.plan_source()?;
        let id = source.definition().id.clone();

        let input = AgentInput::new(snapshots, self.history(), self.config.run.clone());
        let insights = match Self::invoke(source, input).await {
            Ok(insights) => insights,
            Err(message) => {
                tracing::warn!(agent = %id, error = %message, "plan source failed");
                return None;
            }
        };

        insights.iter().find_map(ExecutionPlan::from_insight)
    }

    /// Run the recommended plan, or every registered agent sequentially
    ///
    /// The fallback wraps the sequential run in a report under a synthetic
    /// plan id.
    pub async fn run_all(&self, snapshots: &SnapshotSet) -> ExecutionReport {
        if let Some(plan) = self.recommended_plan(snapshots).await {
            tracing::info!(plan = %plan.id, "executing recommended plan");
            return self.run_plan(&plan, snapshots).await;
        }

        tracing::info!("no recommended plan, running all registered agents sequentially");
        let started_at = Utc::now();
        let started = Instant::now();

        let ids = self.registry.ids();
        let insights = self.run_sequential(&ids, snapshots).await;

        let metrics = RunMetrics {
            agents_executed: ids.len(),
            insights_produced: insights.len(),
            errors: 0,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        ExecutionReport {
            plan: PlanId::new(),
            label: "sequential-fallback".to_string(),
            started_at,
            finished_at: Utc::now(),
            insights,
            metrics,
            errors: Vec::new(),
        }
    }

    /// Jointly await a spawned stage, converting per-agent failures to
    /// error records
    async fn settle_stage(
        stage: &str,
        handles: Vec<(String, Option<JoinHandle<Result<Vec<Insight>, String>>>)>,
    ) -> (Vec<Insight>, Vec<StageError>) {
        let mut insights = Vec::new();
        let mut errors = Vec::new();

        let mut joined = Vec::new();
        for (id, handle) in handles {
            match handle {
                Some(handle) => joined.push((id, handle)),
                None => {
                    tracing::warn!(agent = %id, stage, "unknown agent in stage");
                    errors.push(StageError::agent_failure(stage, &id, "unknown agent"));
                }
            }
        }

        let (names, handles): (Vec<_>, Vec<_>) = joined.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        for (id, result) in names.into_iter().zip(results) {
            match Self::flatten(result) {
                Ok(produced) => insights.extend(produced),
                Err(message) => {
                    tracing::warn!(agent = %id, stage, error = %message, "agent failed in stage");
                    errors.push(StageError::agent_failure(stage, &id, message));
                }
            }
        }

        (insights, errors)
    }

    /// Invoke one agent through the execution template
    async fn invoke_raw(
        agent: Arc<dyn AnalysisAgent>,
        input: AgentInput,
    ) -> Result<Vec<Insight>, String> {
        harness::execute(agent.as_ref(), &input)
            .await
            .map_err(|e| e.to_string())
    }

    /// Invoke with panic isolation via a spawned task
    async fn invoke(
        agent: Arc<dyn AnalysisAgent>,
        input: AgentInput,
    ) -> Result<Vec<Insight>, String> {
        Self::flatten(tokio::spawn(Self::invoke_raw(agent, input)).await)
    }

    /// Flatten a joined task's layered results into one failure channel
    fn flatten(
        joined: Result<Result<Vec<Insight>, String>, tokio::task::JoinError>,
    ) -> Result<Vec<Insight>, String> {
        match joined {
            Ok(result) => result,
            Err(join_error) => Err(format!("agent task failed: {join_error}")),
        }
    }

    /// Append produced insights and trim the history to capacity
    fn record(&self, insights: &[Insight]) {
        if insights.is_empty() {
            return;
        }
        let mut history = self.history.lock();
        history.extend(insights.iter().cloned());
        while history.len() > self.config.max_history {
            history.pop_front();
        }
    }
}

impl std::fmt::Debug for InsightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightEngine")
            .field("registry", &self.registry)
            .field("max_history", &self.config.max_history)
            .field("history_len", &self.history.lock().len())
            .finish()
    }
}
