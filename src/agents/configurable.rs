//! Configurable Agent implementation
//!
//! Every agent is a [`ConfigurableAgent`]: a model, a system prompt and the
//! subset of tools it may call. Agents with tools run the
//! [`ToolCoordinator`] loop; agents without tools make a single completion.

use crate::agents::prompts::default_system_prompt;
use crate::agents::Agent;
use crate::llm::coordinator::{ConversationMessage, ToolCallingConfig, ToolCoordinator};
use crate::llm::LLMClient;
use crate::tools::registry::ToolRegistry;
use crate::types::{AgentContext, AgentType, MessageRole, Result};
use crate::utils::toml_config::AgentConfig;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Conversation turns carried into each request.
const HISTORY_WINDOW: usize = 5;

pub struct ConfigurableAgent {
    agent_type: AgentType,
    llm: Box<dyn LLMClient>,
    system_prompt: String,
    /// Only the tools this agent may call
    tools: ToolRegistry,
    tool_calling: ToolCallingConfig,
}

impl ConfigurableAgent {
    /// Create an agent from its `[agents.<name>]` entry.
    ///
    /// `tools` is narrowed to `config.tools`; names missing from it are
    /// ignored.
    pub fn new(
        agent_type: AgentType,
        config: &AgentConfig,
        llm: Box<dyn LLMClient>,
        tools: &ToolRegistry,
        tool_timeout: Duration,
    ) -> Self {
        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| default_system_prompt(agent_type).to_string());

        Self {
            agent_type,
            llm,
            system_prompt,
            tools: tools.subset(&config.tools),
            tool_calling: ToolCallingConfig {
                max_iterations: config.max_tool_iterations,
                parallel_execution: config.parallel_tools,
                tool_timeout,
            },
        }
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Names of the tools this agent can call, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.tool_names()
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub fn max_tool_iterations(&self) -> usize {
        self.tool_calling.max_iterations
    }

    fn recent_history(context: &AgentContext) -> impl Iterator<Item = &crate::types::Message> {
        let skip = context
            .conversation_history
            .len()
            .saturating_sub(HISTORY_WINDOW);
        context.conversation_history.iter().skip(skip)
    }
}

#[async_trait]
impl Agent for ConfigurableAgent {
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String> {
        if self.has_tools() {
            let history: Vec<ConversationMessage> = Self::recent_history(context)
                .map(|msg| match msg.role {
                    MessageRole::User => ConversationMessage::user(&msg.content),
                    MessageRole::Assistant => ConversationMessage::assistant(&msg.content, vec![]),
                    MessageRole::System => ConversationMessage::system(&msg.content),
                })
                .collect();

            let coordinator =
                ToolCoordinator::new(self.llm.as_ref(), &self.tools, self.tool_calling.clone());
            let result = coordinator
                .execute(Some(&self.system_prompt), &history, input)
                .await?;

            debug!(
                agent = %self.agent_type,
                iterations = result.iterations,
                tool_calls = result.tool_calls.len(),
                finish = %result.finish_reason,
                "Agent finished tool loop"
            );
            return Ok(result.content);
        }

        let mut messages = vec![("system".to_string(), self.system_prompt.clone())];
        for msg in Self::recent_history(context) {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::System => "system",
            };
            messages.push((role.to_string(), msg.content.clone()));
        }
        messages.push(("user".to_string(), input.to_string()));

        self.llm.generate_with_history(&messages).await
    }

    fn system_prompt(&self) -> String {
        self.system_prompt.clone()
    }

    fn agent_type(&self) -> AgentType {
        self.agent_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMResponse;
    use crate::tools::registry::Tool;
    use crate::types::{Message, ToolCall, ToolDefinition};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Replays scripted tool-calling responses and records the history it saw.
    #[derive(Default)]
    struct ScriptedLLM {
        responses: Mutex<VecDeque<LLMResponse>>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedLLM {
        fn answer(content: &str) -> LLMResponse {
            LLMResponse {
                content: content.to_string(),
                tool_calls: vec![],
                finish_reason: "stop".to_string(),
                usage: None,
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
            self.seen.lock().extend(messages.iter().cloned());
            Ok(format!("{} messages", messages.len()))
        }

        async fn generate_with_tools_and_history(
            &self,
            _messages: &[ConversationMessage],
            _tools: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            Ok(self
                .responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Self::answer("done")))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct CityCode;

    #[async_trait]
    impl Tool for CityCode {
        fn name(&self) -> &str {
            "get_city_code"
        }
        fn description(&self) -> &str {
            "City code"
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object"})
        }
        async fn execute(&self, _args: Value) -> Result<Value> {
            Ok(json!("City code for Makkah: MEC"))
        }
    }

    fn config(tools: &[&str]) -> AgentConfig {
        AgentConfig {
            model: "default".to_string(),
            system_prompt: None,
            tools: tools.iter().map(|t| t.to_string()).collect(),
            max_tool_iterations: 3,
            parallel_tools: false,
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CityCode));
        registry
    }

    #[test]
    fn test_builtin_prompt_when_unset() {
        let agent = ConfigurableAgent::new(
            AgentType::Visa,
            &config(&[]),
            Box::new(ScriptedLLM::default()),
            &registry(),
            Duration::from_secs(30),
        );
        assert!(agent.system_prompt().contains("Visa Requirements Specialist"));
        assert!(!agent.has_tools());
    }

    #[test]
    fn test_tools_limited_to_config() {
        let agent = ConfigurableAgent::new(
            AgentType::Hotel,
            &config(&["get_city_code", "search_hotels"]),
            Box::new(ScriptedLLM::default()),
            &registry(),
            Duration::from_secs(30),
        );
        assert_eq!(agent.tool_names(), vec!["get_city_code"]);
    }

    #[tokio::test]
    async fn test_plain_agent_keeps_last_turns() {
        let llm = Arc::new(ScriptedLLM::default());
        struct Shared(Arc<ScriptedLLM>);

        #[async_trait]
        impl LLMClient for Shared {
            async fn generate(&self, p: &str) -> Result<String> {
                self.0.generate(p).await
            }
            async fn generate_with_system(&self, s: &str, p: &str) -> Result<String> {
                self.0.generate_with_system(s, p).await
            }
            async fn generate_with_history(&self, m: &[(String, String)]) -> Result<String> {
                self.0.generate_with_history(m).await
            }
            async fn generate_with_tools_and_history(
                &self,
                m: &[ConversationMessage],
                t: &[ToolDefinition],
            ) -> Result<LLMResponse> {
                self.0.generate_with_tools_and_history(m, t).await
            }
            fn model_name(&self) -> &str {
                "shared"
            }
        }

        let agent = ConfigurableAgent::new(
            AgentType::Itinerary,
            &config(&[]),
            Box::new(Shared(llm.clone())),
            &ToolRegistry::new(),
            Duration::from_secs(30),
        );

        let mut context = AgentContext::new("s-1");
        for i in 0..8 {
            context.conversation_history.push(Message {
                role: MessageRole::User,
                content: format!("turn {}", i),
            });
        }

        let answer = agent.execute("Plan 10 days", &context).await.unwrap();
        // system + 5 history turns + input
        assert_eq!(answer, "7 messages");
        let seen = llm.seen.lock();
        assert_eq!(seen[1].1, "turn 3");
        assert_eq!(seen.last().unwrap().1, "Plan 10 days");
    }

    #[tokio::test]
    async fn test_tool_agent_runs_coordinator() {
        let llm = ScriptedLLM::default();
        llm.responses.lock().push_back(LLMResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: "get_city_code".to_string(),
                arguments: json!({"city_name": "Makkah"}),
            }],
            finish_reason: "tool_calls".to_string(),
            usage: None,
        });
        llm.responses
            .lock()
            .push_back(ScriptedLLM::answer("Hotels in MEC coming up"));

        let agent = ConfigurableAgent::new(
            AgentType::Hotel,
            &config(&["get_city_code"]),
            Box::new(llm),
            &registry(),
            Duration::from_secs(30),
        );

        let answer = agent
            .execute("Hotels in Makkah", &AgentContext::new("s-2"))
            .await
            .unwrap();
        assert_eq!(answer, "Hotels in MEC coming up");
    }
}
