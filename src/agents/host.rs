//! In-process agent hosting
//!
//! [`LocalAgentHost`] runs all five agents against the configured LLM
//! providers and implements [`AgentInvoker`], so it can stand in for the
//! hosted runtime. The orchestrator's delegation tools call whichever invoker
//! the host is given: the hosted runtime in remote mode, otherwise a separate
//! [`SpecialistHost`] whose agents only ever see the flight and hotel tools.

use crate::agents::registry::AgentRegistry;
use crate::agents::Agent;
use crate::llm::LLMClientFactoryTrait;
use crate::runtime::AgentInvoker;
use crate::tools::{orchestrator_tools, specialist_tools};
use crate::travel::TravelServices;
use crate::types::{
    AgentContext, AgentType, AppError, InvocationRequest, InvocationResponse, InvocationStatus,
    Result,
};
use crate::utils::toml_config::UmrahConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Prompt used when an invocation payload carries none.
pub const DEFAULT_PROMPT: &str = "Hello";

async fn run_agent(
    registry: &AgentRegistry,
    agent: AgentType,
    prompt: &str,
    session_id: Option<&str>,
) -> Result<String> {
    let session = session_id
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let context = AgentContext::new(session);

    let instance = registry.create_agent(agent).await?;
    instance.execute(prompt, &context).await
}

/// Runs the flight, hotel, visa and itinerary agents.
pub struct SpecialistHost {
    registry: AgentRegistry,
}

impl SpecialistHost {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    async fn run(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<String> {
        if !agent.is_specialist() {
            return Err(AppError::InvalidInput(format!(
                "{} cannot be reached from a specialist host",
                agent
            )));
        }
        run_agent(&self.registry, agent, prompt, session_id).await
    }
}

#[async_trait]
impl AgentInvoker for SpecialistHost {
    async fn invoke(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<Value> {
        let text = self.run(agent, prompt, session_id).await?;
        Ok(json!({ "result": text, "status": InvocationStatus::Success }))
    }

    async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
        self.run(agent, prompt, None).await
    }

    fn agents(&self) -> Vec<AgentType> {
        AgentType::ALL
            .into_iter()
            .filter(|a| a.is_specialist())
            .collect()
    }
}

/// All five agents running in this process.
pub struct LocalAgentHost {
    specialists: Arc<SpecialistHost>,
    orchestrator: AgentRegistry,
}

impl LocalAgentHost {
    /// Build the host. The orchestrator delegates through `delegate` when
    /// given, and to the in-process specialists otherwise.
    pub fn new(
        config: &UmrahConfig,
        llm_factory: Arc<dyn LLMClientFactoryTrait>,
        travel: &TravelServices,
        delegate: Option<Arc<dyn AgentInvoker>>,
    ) -> Self {
        let specialists = Arc::new(SpecialistHost::new(AgentRegistry::from_config(
            config,
            Arc::clone(&llm_factory),
            specialist_tools(config, travel),
        )));

        let delegate =
            delegate.unwrap_or_else(|| Arc::clone(&specialists) as Arc<dyn AgentInvoker>);
        let orchestrator = AgentRegistry::from_config(
            config,
            llm_factory,
            orchestrator_tools(config, delegate),
        );

        Self {
            specialists,
            orchestrator,
        }
    }

    /// Registry used for the given agent.
    pub fn registry(&self, agent: AgentType) -> &AgentRegistry {
        match agent {
            AgentType::Orchestrator => &self.orchestrator,
            _ => &self.specialists.registry,
        }
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn run(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<String> {
        info!("Running local agent");
        match agent {
            AgentType::Orchestrator => {
                run_agent(&self.orchestrator, agent, prompt, session_id).await
            }
            _ => self.specialists.run(agent, prompt, session_id).await,
        }
    }
}

/// Runtime-style entrypoint: run `agent` on the payload and wrap the outcome.
///
/// Failures are reported inside the envelope with status `error`; the
/// orchestrator's failure text is wrapped as message content.
pub async fn entrypoint(
    host: &LocalAgentHost,
    agent: AgentType,
    payload: &InvocationRequest,
    session_id: Option<&str>,
) -> InvocationResponse {
    let prompt = payload.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);

    match host.run(agent, prompt, session_id).await {
        Ok(text) => InvocationResponse {
            result: Value::String(text),
            status: InvocationStatus::Success,
        },
        Err(e) => {
            warn!(agent = %agent, error = %e, "Agent invocation failed");
            let message = format!("I apologize, but I encountered an error: {}", e);
            let result = match agent {
                AgentType::Orchestrator => json!({ "content": [{ "text": message }] }),
                _ => Value::String(message),
            };
            InvocationResponse {
                result,
                status: InvocationStatus::Error,
            }
        }
    }
}

#[async_trait]
impl AgentInvoker for LocalAgentHost {
    async fn invoke(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<Value> {
        let payload = InvocationRequest {
            prompt: Some(prompt.to_string()),
        };
        let response = entrypoint(self, agent, &payload, session_id).await;
        Ok(serde_json::to_value(response)?)
    }

    async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
        self.run(agent, prompt, None).await
    }

    fn agents(&self) -> Vec<AgentType> {
        AgentType::ALL.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::coordinator::ConversationMessage;
    use crate::llm::{LLMClient, LLMResponse};
    use crate::types::{ToolCall, ToolDefinition};
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Each client created pops the next scripted reply; tool calls are
    /// issued for prompts asking for visas.
    #[derive(Default)]
    struct Script {
        fail: bool,
        tool_definitions: Mutex<Vec<Vec<String>>>,
        replies: Mutex<VecDeque<String>>,
    }

    struct ScriptClient(Arc<Script>);

    #[async_trait]
    impl LLMClient for ScriptClient {
        async fn generate(&self, p: &str) -> Result<String> {
            Ok(p.to_string())
        }
        async fn generate_with_system(&self, _: &str, p: &str) -> Result<String> {
            Ok(p.to_string())
        }
        async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
            if self.0.fail {
                return Err(AppError::LLM("quota exceeded".into()));
            }
            let last = messages.last().map(|m| m.1.clone()).unwrap_or_default();
            Ok(format!("visa answer for: {}", last))
        }
        async fn generate_with_tools_and_history(
            &self,
            messages: &[ConversationMessage],
            tools: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            self.0
                .tool_definitions
                .lock()
                .push(tools.iter().map(|t| t.name.clone()).collect());

            let has_tool_result = messages
                .iter()
                .any(|m| m.role == crate::llm::coordinator::MessageRole::Tool);

            if has_tool_result || !tools.iter().any(|t| t.name == "get_visa_info") {
                let reply = self.0.replies.lock().pop_front().unwrap_or_default();
                return Ok(LLMResponse {
                    content: reply,
                    tool_calls: vec![],
                    finish_reason: "stop".into(),
                    usage: None,
                });
            }

            Ok(LLMResponse {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    id: "call_visa".into(),
                    name: "get_visa_info".into(),
                    arguments: json!({"request": "British citizens"}),
                }],
                finish_reason: "tool_calls".into(),
                usage: None,
            })
        }
        fn model_name(&self) -> &str {
            "script"
        }
    }

    struct ScriptFactory(Arc<Script>);

    #[async_trait]
    impl LLMClientFactoryTrait for ScriptFactory {
        async fn create_for_model(&self, _: &str) -> Result<Box<dyn LLMClient>> {
            Ok(Box::new(ScriptClient(Arc::clone(&self.0))))
        }
        async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
            Ok(Box::new(ScriptClient(Arc::clone(&self.0))))
        }
    }

    fn host(script: Arc<Script>) -> LocalAgentHost {
        LocalAgentHost::new(
            &UmrahConfig::default(),
            Arc::new(ScriptFactory(script)),
            &TravelServices::default(),
            None,
        )
    }

    #[tokio::test]
    async fn test_entrypoint_defaults_prompt() {
        let host = host(Arc::new(Script::default()));
        let response = entrypoint(
            &host,
            AgentType::Visa,
            &InvocationRequest { prompt: None },
            None,
        )
        .await;

        assert_eq!(response.status, InvocationStatus::Success);
        assert_eq!(response.result, json!("visa answer for: Hello"));
    }

    #[tokio::test]
    async fn test_entrypoint_wraps_errors() {
        let host = host(Arc::new(Script {
            fail: true,
            ..Default::default()
        }));
        let payload = InvocationRequest {
            prompt: Some("Visa for Pakistan?".into()),
        };

        let visa = entrypoint(&host, AgentType::Visa, &payload, None).await;
        assert_eq!(visa.status, InvocationStatus::Error);
        assert_eq!(
            visa.result,
            json!("I apologize, but I encountered an error: LLM error: quota exceeded")
        );
    }

    #[tokio::test]
    async fn test_orchestrator_delegates_to_specialist() {
        let script = Arc::new(Script::default());
        script
            .replies
            .lock()
            .push_back("Here is your Umrah plan".to_string());
        let host = host(Arc::clone(&script));

        let text = host
            .invoke_text(AgentType::Orchestrator, "Plan my trip")
            .await
            .unwrap();
        assert_eq!(text, "Here is your Umrah plan");

        // orchestrator saw only delegation tools
        let seen = script.tool_definitions.lock();
        assert_eq!(
            seen[0],
            vec!["create_itinerary", "get_visa_info", "search_flights_agent", "search_hotels_agent"]
        );
    }

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(AgentType, String)>>,
    }

    #[async_trait]
    impl AgentInvoker for RecordingInvoker {
        async fn invoke(&self, _: AgentType, _: &str, _: Option<&str>) -> Result<Value> {
            Ok(json!({ "result": "unused" }))
        }

        async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
            self.calls.lock().push((agent, prompt.to_string()));
            Ok("eVisa on arrival".to_string())
        }

        fn agents(&self) -> Vec<AgentType> {
            AgentType::ALL.to_vec()
        }
    }

    #[tokio::test]
    async fn test_orchestrator_delegates_through_given_invoker() {
        let script = Arc::new(Script::default());
        script.replies.lock().push_back("Plan ready".to_string());
        let delegate = Arc::new(RecordingInvoker::default());
        let host = LocalAgentHost::new(
            &UmrahConfig::default(),
            Arc::new(ScriptFactory(Arc::clone(&script))),
            &TravelServices::default(),
            Some(Arc::clone(&delegate) as Arc<dyn AgentInvoker>),
        );

        let text = host
            .invoke_text(AgentType::Orchestrator, "Plan my trip")
            .await
            .unwrap();
        assert_eq!(text, "Plan ready");

        let calls = delegate.calls.lock();
        assert_eq!(
            *calls,
            vec![(AgentType::Visa, "British citizens".to_string())]
        );
    }

    #[tokio::test]
    async fn test_specialists_never_see_delegation_tools() {
        let script = Arc::new(Script::default());
        let host = host(Arc::clone(&script));
        host.invoke_text(AgentType::Hotel, "Hotels in Makkah")
            .await
            .unwrap();

        let seen = script.tool_definitions.lock();
        assert_eq!(seen[0], vec!["get_city_code", "search_hotels"]);
    }

    #[tokio::test]
    async fn test_specialist_host_rejects_orchestrator() {
        let script = Arc::new(Script::default());
        let host = host(script);
        let result = host
            .specialists
            .invoke_text(AgentType::Orchestrator, "loop")
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
