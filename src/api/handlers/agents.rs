use crate::{types::AgentType, AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentInfo {
    pub agent_type: AgentType,
    pub name: String,
    /// Model from `[agents.<name>]`, or `None` for the default model.
    pub model: Option<String>,
    pub tools: Vec<String>,
    /// Whether the configured invoker can reach this agent.
    pub available: bool,
}

/// List the planning agents
#[utoipa::path(
    get,
    path = "/api/agents",
    responses(
        (status = 200, description = "Configured agents", body = Vec<AgentInfo>),
        (status = 401, description = "Missing or invalid API key")
    ),
    tag = "agents",
    security(("api_key" = []))
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentInfo>> {
    let reachable = state.invoker.agents();

    Json(
        AgentType::ALL
            .iter()
            .map(|&agent| {
                let registry = state.agent_host.registry(agent);
                AgentInfo {
                    agent_type: agent,
                    name: agent.display_name().to_string(),
                    model: registry.get_agent_model(agent),
                    tools: registry.get_agent_tools(agent),
                    available: reachable.contains(&agent),
                }
            })
            .collect(),
    )
}
