//! Multi-turn tool calling
//!
//! [`ToolCoordinator`] drives the loop every tool-using agent runs:
//!
//! 1. Send the conversation and the agent's tool definitions to the model
//! 2. Execute the tool calls the model asks for
//! 3. Append the results to the conversation
//! 4. Repeat until the model answers in plain text or `max_iterations` is hit
//!
//! A tool that fails, times out or does not exist produces an error result
//! that is fed back to the model; only LLM errors abort the loop.

use crate::llm::client::{LLMClient, TokenUsage};
use crate::tools::registry::ToolRegistry;
use crate::types::{Result, ToolCall};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Configuration for tool calling coordination behavior.
#[derive(Debug, Clone)]
pub struct ToolCallingConfig {
    /// Maximum number of LLM round-trips before stopping.
    pub max_iterations: usize,

    /// Whether to execute multiple tool calls from one response concurrently.
    pub parallel_execution: bool,

    /// Timeout for individual tool execution.
    pub tool_timeout: Duration,
}

impl Default for ToolCallingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            parallel_execution: false,
            tool_timeout: Duration::from_secs(30),
        }
    }
}

/// Record of a single tool call execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    /// Result returned by the tool (or an `{"error": ...}` object).
    pub result: serde_json::Value,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Reason why a tool coordination session ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FinishReason {
    /// Model answered without requesting tools.
    Stop,
    /// Hit the maximum iterations limit.
    MaxIterations,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::MaxIterations => write!(f, "max_iterations"),
        }
    }
}

/// A message in a tool-calling conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    /// Tool calls requested by the assistant (only for Assistant role).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call this message answers (only for Tool role).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Role of a message sender in a tool-calling conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Tool result message. String results are passed through verbatim,
    /// anything else as compact JSON.
    pub fn tool_result(tool_call_id: impl Into<String>, result: &serde_json::Value) -> Self {
        let content = match result {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };

        Self {
            role: MessageRole::Tool,
            content,
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Result of a complete tool coordination session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorResult {
    /// Final text response from the model.
    pub content: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub iterations: usize,
    pub finish_reason: FinishReason,
    pub total_usage: TokenUsage,
    pub message_history: Vec<ConversationMessage>,
}

/// Runs the tool-calling loop for one agent turn.
pub struct ToolCoordinator<'a> {
    client: &'a dyn LLMClient,
    registry: &'a ToolRegistry,
    config: ToolCallingConfig,
}

impl<'a> ToolCoordinator<'a> {
    pub fn new(
        client: &'a dyn LLMClient,
        registry: &'a ToolRegistry,
        config: ToolCallingConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    /// Run the conversation `history` + `prompt` to completion.
    pub async fn execute(
        &self,
        system: Option<&str>,
        history: &[ConversationMessage],
        prompt: &str,
    ) -> Result<CoordinatorResult> {
        let tools = self.registry.get_tool_definitions();
        let mut messages: Vec<ConversationMessage> = Vec::with_capacity(history.len() + 2);
        let mut all_tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut total_usage = TokenUsage::default();
        let mut last_answer = String::new();

        if let Some(sys) = system {
            messages.push(ConversationMessage::system(sys));
        }
        messages.extend(history.iter().cloned());
        messages.push(ConversationMessage::user(prompt));

        for iteration in 0..self.config.max_iterations {
            let response = self
                .client
                .generate_with_tools_and_history(&messages, &tools)
                .await?;

            if let Some(usage) = &response.usage {
                total_usage = TokenUsage::new(
                    total_usage.prompt_tokens + usage.prompt_tokens,
                    total_usage.completion_tokens + usage.completion_tokens,
                );
            }

            if !response.content.trim().is_empty() {
                last_answer = response.content.clone();
            }

            messages.push(ConversationMessage::assistant(
                &response.content,
                response.tool_calls.clone(),
            ));

            if response.tool_calls.is_empty() {
                return Ok(CoordinatorResult {
                    content: response.content,
                    tool_calls: all_tool_calls,
                    iterations: iteration + 1,
                    finish_reason: FinishReason::Stop,
                    total_usage,
                    message_history: messages,
                });
            }

            debug!(
                iteration,
                calls = response.tool_calls.len(),
                "Executing requested tools"
            );

            for record in self.execute_tool_calls(&response.tool_calls).await {
                messages.push(ConversationMessage::tool_result(&record.id, &record.result));
                all_tool_calls.push(record);
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Tool loop hit the iteration limit"
        );

        Ok(CoordinatorResult {
            content: last_answer,
            tool_calls: all_tool_calls,
            iterations: self.config.max_iterations,
            finish_reason: FinishReason::MaxIterations,
            total_usage,
            message_history: messages,
        })
    }

    async fn execute_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolCallRecord> {
        if self.config.parallel_execution {
            join_all(calls.iter().map(|call| self.execute_single_tool(call))).await
        } else {
            let mut records = Vec::with_capacity(calls.len());
            for call in calls {
                records.push(self.execute_single_tool(call).await);
            }
            records
        }
    }

    async fn execute_single_tool(&self, call: &ToolCall) -> ToolCallRecord {
        let start = Instant::now();

        let outcome = if self.registry.has_tool(&call.name) {
            match timeout(
                self.config.tool_timeout,
                self.registry.execute(&call.name, call.arguments.clone()),
            )
            .await
            {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err("Tool execution timed out".to_string()),
            }
        } else {
            Err(format!("Unknown tool: {}", call.name))
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => ToolCallRecord {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
                result,
                success: true,
                duration_ms,
                error: None,
            },
            Err(error) => {
                warn!(tool = %call.name, "Tool call failed: {}", error);
                ToolCallRecord {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                    result: serde_json::json!({ "error": error }),
                    success: false,
                    duration_ms,
                    error: Some(error),
                }
            }
        }
    }
}
