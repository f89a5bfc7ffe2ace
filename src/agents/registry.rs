//! Agent Registry for creating configured agents
//!
//! Each agent is looked up in `[agents.<name>]`. An agent without an entry
//! still exists: it gets its built-in system prompt and tools and runs on the
//! default model.

use crate::agents::configurable::ConfigurableAgent;
use crate::agents::prompts::default_tools;
use crate::llm::LLMClientFactoryTrait;
use crate::tools::registry::ToolRegistry;
use crate::types::{AgentType, Result};
use crate::utils::toml_config::{AgentConfig, ToolConfig, UmrahConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub struct AgentRegistry {
    /// Agent configurations keyed by agent name
    configs: HashMap<String, AgentConfig>,
    /// Tool settings, for per-agent tool timeouts
    tool_settings: HashMap<String, ToolConfig>,
    llm_factory: Arc<dyn LLMClientFactoryTrait>,
    /// Tools the agents of this registry may draw from
    tools: ToolRegistry,
}

impl AgentRegistry {
    pub fn from_config(
        config: &UmrahConfig,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            configs: config.agents.clone(),
            tool_settings: config.tools.clone(),
            llm_factory,
            tools,
        }
    }

    /// Register or replace an agent configuration
    pub fn register(&mut self, agent: AgentType, config: AgentConfig) {
        self.configs.insert(agent.as_str().to_string(), config);
    }

    pub fn get_config(&self, agent: AgentType) -> Option<&AgentConfig> {
        self.configs.get(agent.as_str())
    }

    /// The configured model, or `None` when the default model is used.
    pub fn get_agent_model(&self, agent: AgentType) -> Option<String> {
        self.get_config(agent).map(|c| c.model.clone())
    }

    /// Tool names the agent would be given, before enablement filtering.
    pub fn get_agent_tools(&self, agent: AgentType) -> Vec<String> {
        match self.get_config(agent) {
            Some(config) => config.tools.clone(),
            None => default_tools(agent).iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Create a fresh agent instance.
    pub async fn create_agent(&self, agent: AgentType) -> Result<ConfigurableAgent> {
        let (config, llm) = match self.get_config(agent) {
            Some(config) => (
                config.clone(),
                self.llm_factory.create_for_model(&config.model).await?,
            ),
            None => {
                let llm = self.llm_factory.create_default().await?;
                let config = AgentConfig {
                    model: llm.model_name().to_string(),
                    system_prompt: None,
                    tools: self.get_agent_tools(agent),
                    max_tool_iterations: 10,
                    parallel_tools: false,
                };
                (config, llm)
            }
        };

        let timeout = self.tool_timeout(&config.tools);
        Ok(ConfigurableAgent::new(agent, &config, llm, &self.tools, timeout))
    }

    /// Longest configured timeout among `tools`, 30 s when none is set.
    fn tool_timeout(&self, tools: &[String]) -> Duration {
        let secs = tools
            .iter()
            .filter_map(|name| self.tool_settings.get(name))
            .map(|t| t.timeout_secs)
            .max()
            .unwrap_or_else(|| ToolConfig::default().timeout_secs);
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use crate::llm::coordinator::ConversationMessage;
    use crate::llm::{LLMClient, LLMResponse};
    use crate::types::{AppError, ToolDefinition};
    use async_trait::async_trait;

    struct Named(String);

    #[async_trait]
    impl LLMClient for Named {
        async fn generate(&self, _: &str) -> Result<String> {
            Ok(self.0.clone())
        }
        async fn generate_with_system(&self, _: &str, _: &str) -> Result<String> {
            Ok(self.0.clone())
        }
        async fn generate_with_history(&self, _: &[(String, String)]) -> Result<String> {
            Ok(self.0.clone())
        }
        async fn generate_with_tools_and_history(
            &self,
            _: &[ConversationMessage],
            _: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            Ok(LLMResponse {
                content: self.0.clone(),
                tool_calls: vec![],
                finish_reason: "stop".to_string(),
                usage: None,
            })
        }
        fn model_name(&self) -> &str {
            &self.0
        }
    }

    struct Factory;

    #[async_trait]
    impl LLMClientFactoryTrait for Factory {
        async fn create_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
            if model_name == "missing" {
                return Err(AppError::Configuration("Model 'missing' not found".into()));
            }
            Ok(Box::new(Named(model_name.to_string())))
        }

        async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
            Ok(Box::new(Named("fast".to_string())))
        }
    }

    fn registry(config: &UmrahConfig) -> AgentRegistry {
        AgentRegistry::from_config(config, Arc::new(Factory), ToolRegistry::new())
    }

    #[tokio::test]
    async fn test_unconfigured_agent_uses_defaults() {
        let registry = registry(&UmrahConfig::default());
        assert_eq!(registry.get_agent_model(AgentType::Flight), None);
        assert_eq!(
            registry.get_agent_tools(AgentType::Flight),
            vec!["search_flights", "get_airport_code"]
        );

        let agent = registry.create_agent(AgentType::Visa).await.unwrap();
        assert_eq!(agent.model_name(), "fast");
        assert_eq!(agent.agent_type(), AgentType::Visa);
    }

    #[tokio::test]
    async fn test_configured_model() {
        let mut config = UmrahConfig::default();
        config.agents.insert(
            "itinerary".to_string(),
            AgentConfig {
                model: "smart".to_string(),
                system_prompt: Some("Plan pilgrimages.".to_string()),
                tools: vec![],
                max_tool_iterations: 4,
                parallel_tools: false,
            },
        );

        let agent = registry(&config)
            .create_agent(AgentType::Itinerary)
            .await
            .unwrap();
        assert_eq!(agent.model_name(), "smart");
        assert_eq!(agent.system_prompt(), "Plan pilgrimages.");
        assert_eq!(agent.max_tool_iterations(), 4);
    }

    #[tokio::test]
    async fn test_missing_model_fails() {
        let mut registry = registry(&UmrahConfig::default());
        registry.register(
            AgentType::Hotel,
            AgentConfig {
                model: "missing".to_string(),
                system_prompt: None,
                tools: vec![],
                max_tool_iterations: 10,
                parallel_tools: false,
            },
        );
        assert!(registry.create_agent(AgentType::Hotel).await.is_err());
    }

    #[test]
    fn test_tool_timeout_takes_longest() {
        let mut config = UmrahConfig::default();
        config.tools.insert(
            "search_hotels".to_string(),
            ToolConfig {
                timeout_secs: 90,
                ..Default::default()
            },
        );
        let registry = registry(&config);
        assert_eq!(
            registry.tool_timeout(&["get_city_code".to_string(), "search_hotels".to_string()]),
            Duration::from_secs(90)
        );
        assert_eq!(registry.tool_timeout(&[]), Duration::from_secs(30));
    }
}
