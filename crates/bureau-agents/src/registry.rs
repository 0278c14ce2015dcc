//! Agent registry
//!
//! A static lookup from agent identifier to agent instance. Agents are
//! constructed once (stateless, concurrency-safe) and shared behind `Arc`s
//! for the process lifetime.

use crate::agents::{
    DimensionDriftAgent, FocusPatternAgent, MetaOrchestratorAgent, TopologyHealthAgent,
};
use crate::contract::AnalysisAgent;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of analysis agents
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn AnalysisAgent>>,
}

impl AgentRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Create a registry with the built-in agents
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MetaOrchestratorAgent::new()));
        registry.register(Arc::new(FocusPatternAgent::new()));
        registry.register(Arc::new(DimensionDriftAgent::new()));
        registry.register(Arc::new(TopologyHealthAgent::new()));
        registry
    }

    /// Register an agent under its definition id
    ///
    /// A later registration under the same id replaces the earlier one.
    pub fn register(&mut self, agent: Arc<dyn AnalysisAgent>) {
        self.agents
            .insert(agent.definition().id.clone(), agent);
    }

    /// Look up an agent by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn AnalysisAgent>> {
        self.agents.get(id).cloned()
    }

    /// Check if an agent is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    /// All registered ids, ordered by scheduling priority then id
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<(u8, String)> = self
            .agents
            .values()
            .map(|a| (a.definition().priority, a.definition().id.clone()))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// The first registered plan-capable agent, if any
    #[must_use]
    pub fn plan_source(&self) -> Option<Arc<dyn AnalysisAgent>> {
        let mut candidates: Vec<Arc<dyn AnalysisAgent>> = self
            .agents
            .values()
            .filter(|a| a.definition().plans)
            .cloned()
            .collect();
        candidates.sort_by_key(|a| (a.definition().priority, a.definition().id.clone()));
        candidates.into_iter().next()
    }

    /// Number of registered agents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_new_empty() {
        let registry = AgentRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.plan_source().is_none());
    }

    #[test]
    fn registry_with_defaults() {
        let registry = AgentRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert!(registry.contains("focus-pattern"));
        assert!(registry.contains("dimension-drift"));
        assert!(registry.contains("topology-health"));
        assert!(registry.contains("meta-orchestrator"));
    }

    #[test]
    fn registry_get_unknown() {
        let registry = AgentRegistry::with_defaults();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_ids_priority_ordered() {
        let registry = AgentRegistry::with_defaults();
        let ids = registry.ids();

        // The orchestrator runs first, then the analyzers by priority.
        assert_eq!(ids.first().map(String::as_str), Some("meta-orchestrator"));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn registry_plan_source_is_orchestrator() {
        let registry = AgentRegistry::with_defaults();
        let source = registry.plan_source().unwrap();
        assert_eq!(source.definition().id, "meta-orchestrator");
        assert!(source.definition().plans);
    }
}
