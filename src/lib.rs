//! # Umrah Planner
//!
//! A multi-agent travel planner for Umrah pilgrimage trips.
//!
//! Five LLM agents cooperate on a plan: an orchestrator delegates to flight,
//! hotel, visa and itinerary specialists, which call travel APIs (Amadeus,
//! Booking.com, or an MCP tool gateway) through tools. Agents run either in
//! this process or on a hosted agent runtime. Their free-text answers are
//! parsed into a structured [`TripPlan`](types::TripPlan), and a six-step
//! wizard walks a traveler from dates to a confirmed booking.
//!
//! ## Library usage
//!
//! ```rust,ignore
//! use umrah::{ConfigManager, TripPlanner, AppState};
//! use std::sync::Arc;
//!
//! let config_manager = Arc::new(ConfigManager::new("umrah.toml")?);
//! let state = AppState::from_config(config_manager)?;
//!
//! let trip = state.planner().generate(&request).await;
//! println!("{} flight options", trip.plan.flights.len());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI and compatible APIs (default) |
//! | `anthropic` | Anthropic Claude API |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`agents`] - Agent definitions, registry and in-process host
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - OAuth token cache and API key middleware
//! - [`cli`] - Command-line interface
//! - [`gateway`] - MCP tool gateway client
//! - [`llm`] - LLM clients and the tool-calling loop
//! - [`planner`] - Agent text to structured trip plan
//! - [`runtime`] - Hosted agent runtime client
//! - [`tools`] - Agent tools
//! - [`travel`] - Flight and hotel search backends
//! - [`types`] - Shared types and errors
//! - [`utils`] - Configuration
//! - [`wizard`] - Trip wizard state machine

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Planning agents.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// OAuth client credentials and API key middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// MCP tool gateway client.
pub mod gateway;
/// LLM provider clients and abstractions.
pub mod llm;
/// Parsing agent output into trip plans.
pub mod planner;
/// Hosted agent runtime client.
pub mod runtime;
/// Agent tools.
pub mod tools;
/// Travel API backends.
pub mod travel;
/// Core types and errors.
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Trip wizard.
pub mod wizard;

pub use agents::{AgentRegistry, LocalAgentHost};
pub use llm::{LLMClient, LLMClientFactoryTrait, LLMResponse, Provider, ProviderRegistry};
pub use planner::TripPlanner;
pub use runtime::{AgentInvoker, AgentRuntimeClient};
pub use tools::ToolRegistry;
pub use travel::TravelServices;
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigManager, UmrahConfig};
pub use wizard::SessionStore;

use crate::utils::toml_config::RuntimeMode;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration with hot-reload support
    pub config_manager: Arc<ConfigManager>,
    /// All agents running in this process; serves `/agents/{agent}/invocations`
    pub agent_host: Arc<LocalAgentHost>,
    /// How the planner reaches agents: `agent_host` in local mode, the hosted
    /// runtime in remote mode
    pub invoker: Arc<dyn AgentInvoker>,
    pub sessions: SessionStore,
}

impl AppState {
    /// Build the state from configuration, with LLM providers and travel
    /// backends taken from the config.
    pub fn from_config(config_manager: Arc<ConfigManager>) -> Result<Self> {
        let config = config_manager.config();
        let llm_factory: Arc<dyn LLMClientFactoryTrait> =
            Arc::new(ProviderRegistry::from_config(&config));
        let travel = TravelServices::from_config(&config)?;
        Self::with_factory(config_manager, llm_factory, &travel)
    }

    /// Build the state around a given LLM factory and travel backends.
    ///
    /// In remote mode the orchestrator hosted here also delegates to the
    /// specialists on the hosted runtime.
    pub fn with_factory(
        config_manager: Arc<ConfigManager>,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
        travel: &TravelServices,
    ) -> Result<Self> {
        let config = config_manager.config();

        let remote: Option<Arc<dyn AgentInvoker>> = match config.runtime.mode {
            RuntimeMode::Local => None,
            RuntimeMode::Remote => Some(Arc::new(AgentRuntimeClient::from_config(&config.runtime)?)),
        };

        let agent_host = Arc::new(LocalAgentHost::new(
            &config,
            llm_factory,
            travel,
            remote.clone(),
        ));
        let invoker =
            remote.unwrap_or_else(|| Arc::clone(&agent_host) as Arc<dyn AgentInvoker>);

        Ok(Self {
            config_manager,
            agent_host,
            invoker,
            sessions: SessionStore::new(),
        })
    }

    /// Replace the invoker used by the planner and the agent listing.
    pub fn with_invoker(mut self, invoker: Arc<dyn AgentInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    /// Trip planner for the current `[planner]` settings.
    pub fn planner(&self) -> TripPlanner {
        TripPlanner::new(
            Some(Arc::clone(&self.invoker)),
            &self.config_manager.config().planner,
        )
    }
}
