//! The capability contract
//!
//! Every analysis agent implements [`AnalysisAgent`]: given an immutable
//! input bundle, return zero or more insights. Agents are stateless; the
//! same instance is invoked concurrently without coordination.

use crate::definition::AgentDefinition;
use crate::input::AgentInput;
use bureau_insight::Insight;

/// Errors an agent's analysis can raise
///
/// These never cross the engine's invocation boundary: the engine converts
/// them into an empty result plus a log entry (and a structured error record
/// inside plan runs).
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A required input was structurally unusable
    #[error("missing input: {0}")]
    MissingInput(String),

    /// The analysis itself failed
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// The analysis produced an out-of-contract value
    #[error("invalid output: {0}")]
    InvalidOutput(String),
}

/// The capability contract for analysis agents
///
/// Implementations must be pure with respect to the input bundle: no
/// retained references, no interior mutation, identical output for identical
/// input.
#[async_trait::async_trait]
pub trait AnalysisAgent: Send + Sync {
    /// Static metadata for this agent
    fn definition(&self) -> &AgentDefinition;

    /// Run the analysis against a frozen input bundle
    ///
    /// # Errors
    /// Any [`AgentError`] is trapped at the engine's invocation boundary and
    /// converted to an empty result.
    async fn analyze(&self, input: &AgentInput) -> Result<Vec<Insight>, AgentError>;
}
