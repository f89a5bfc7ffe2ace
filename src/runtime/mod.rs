//! Agent invocation
//!
//! Agents are reached through an [`AgentInvoker`]. In `remote` mode that is
//! the [`AgentRuntimeClient`], which calls agents deployed on the hosted
//! runtime over HTTP. In `local` mode the in-process
//! [`LocalAgentHost`](crate::agents::LocalAgentHost) runs them against the
//! configured LLM providers.
//!
//! Runtime responses are framed either as `application/json` or as a
//! `text/event-stream` whose last `data:` line carries the final JSON.

mod client;
mod prompt;
mod sse;

pub use client::{AgentRuntimeClient, Framing, SESSION_HEADER};
pub use prompt::{extract_text_from_response, format_requirements_prompt};
pub use sse::DataLines;

use crate::types::{AgentType, Result, TripRequest};
use async_trait::async_trait;
use serde_json::Value;

/// Something that can run an agent on a prompt.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Run an agent and return its JSON response. A fresh session is used
    /// when `session_id` is `None`.
    async fn invoke(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<Value>;

    /// Run an agent and return its output as text; failures are `Err`.
    async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String>;

    /// Agents this invoker can reach.
    fn agents(&self) -> Vec<AgentType>;

    /// Ask the orchestrator to plan a whole trip.
    async fn invoke_orchestrator(&self, request: &TripRequest) -> Result<Value> {
        let prompt = format_requirements_prompt(request);
        self.invoke(AgentType::Orchestrator, &prompt, None).await
    }

    async fn invoke_flight_agent(&self, query: &str) -> Result<Value> {
        self.invoke(AgentType::Flight, query, None).await
    }

    async fn invoke_hotel_agent(&self, query: &str) -> Result<Value> {
        self.invoke(AgentType::Hotel, query, None).await
    }

    async fn invoke_visa_agent(&self, query: &str) -> Result<Value> {
        self.invoke(AgentType::Visa, query, None).await
    }

    async fn invoke_itinerary_agent(&self, query: &str) -> Result<Value> {
        self.invoke(AgentType::Itinerary, query, None).await
    }
}
