//! Mock LLM clients, factories and invokers shared by the integration tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use umrah::llm::coordinator::ConversationMessage;
use umrah::llm::{LLMClient, LLMClientFactoryTrait, LLMResponse};
use umrah::runtime::AgentInvoker;
use umrah::types::{AgentType, AppError, Result, ToolCall, ToolDefinition};

/// Mock LLM client with a fixed reply.
///
/// ```ignore
/// let client = MockLLMClient::new("Option 1 (Morning) - $850");
/// let client = MockLLMClient::with_tool_calls("", vec![call]);
/// let client = MockLLMClient::failing();
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    tool_calls: Vec<ToolCall>,
    should_fail: bool,
}

impl MockLLMClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            tool_calls: vec![],
            should_fail: false,
        }
    }

    /// Requests `tool_calls` on the first turn that offers tools, then
    /// answers with `response`.
    pub fn with_tool_calls(response: &str, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            response: response.to_string(),
            tool_calls,
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            tool_calls: vec![],
            should_fail: true,
        }
    }

    fn reply(&self) -> Result<String> {
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.reply()
    }

    async fn generate_with_system(&self, _system: &str, _prompt: &str) -> Result<String> {
        self.reply()
    }

    async fn generate_with_history(&self, _messages: &[(String, String)]) -> Result<String> {
        self.reply()
    }

    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let content = self.reply()?;

        // Tool results already in the conversation: answer instead of looping.
        let answered = messages.iter().any(|m| m.tool_call_id.is_some());
        let tool_calls = if answered {
            vec![]
        } else {
            self.tool_calls.clone()
        };
        let finish_reason = if tool_calls.is_empty() {
            "stop"
        } else {
            "tool_calls"
        };

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason: finish_reason.to_string(),
            usage: None,
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Factory handing out clones of one mock client, counting how many it made.
pub struct MockLLMFactory {
    client: MockLLMClient,
    created: AtomicUsize,
}

impl MockLLMFactory {
    pub fn new(client: MockLLMClient) -> Self {
        Self {
            client,
            created: AtomicUsize::new(0),
        }
    }

    pub fn shared(client: MockLLMClient) -> Arc<dyn LLMClientFactoryTrait> {
        Arc::new(Self::new(client))
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClientFactoryTrait for MockLLMFactory {
    async fn create_for_model(&self, _model_name: &str) -> Result<Box<dyn LLMClient>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.client.clone()))
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.client.clone()))
    }
}

/// Invoker whose agents answer `reply` after `delay`.
pub struct SlowInvoker {
    pub delay: Duration,
    pub reply: String,
}

#[async_trait]
impl AgentInvoker for SlowInvoker {
    async fn invoke(&self, _agent: AgentType, _prompt: &str, _session_id: Option<&str>) -> Result<Value> {
        tokio::time::sleep(self.delay).await;
        Ok(json!({ "result": self.reply, "status": "success" }))
    }

    async fn invoke_text(&self, _agent: AgentType, _prompt: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }

    fn agents(&self) -> Vec<AgentType> {
        AgentType::ALL.to_vec()
    }
}
