//! Umrah planning agents
//!
//! Five agents cooperate on a trip: the orchestrator delegates to the flight,
//! hotel, visa and itinerary specialists through its tools. Each is a
//! [`ConfigurableAgent`] built by an [`AgentRegistry`] from `[agents.<name>]`.

pub mod configurable;
pub mod host;
pub mod prompts;
pub mod registry;

use crate::types::{AgentContext, AgentType, Result};
use async_trait::async_trait;

pub use configurable::ConfigurableAgent;
pub use host::{entrypoint, LocalAgentHost, SpecialistHost, DEFAULT_PROMPT};
pub use registry::AgentRegistry;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute the agent with given input and context
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String>;

    /// Get the agent's system prompt
    fn system_prompt(&self) -> String;

    /// Get the agent type
    fn agent_type(&self) -> AgentType;
}
