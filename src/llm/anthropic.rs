//! Anthropic Claude LLM client implementation
//!
//! Enable with the `anthropic` feature flag.
//!
//! Tool results are sent back to Claude as plain user text (`Tool result for
//! <id>: ...`), so any model that follows instructions can drive the
//! tool loop without structured `tool_result` blocks.

use crate::llm::client::{LLMClient, LLMResponse, ModelParams, TokenUsage};
use crate::llm::coordinator::{ConversationMessage, MessageRole};
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use claude_sdk::{ClaudeClient, ContentBlock, Message, MessagesRequest, StopReason, Tool};
use tracing::instrument;

/// Anthropic Claude client for API-based inference
pub struct AnthropicClient {
    client: ClaudeClient,
    model: String,
    params: ModelParams,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_params(api_key, model, ModelParams::default())
    }

    pub fn with_params(api_key: String, model: String, params: ModelParams) -> Self {
        Self {
            client: ClaudeClient::anthropic(api_key),
            model,
            params,
        }
    }

    /// Get the max tokens, defaulting to 1024 if not specified
    fn max_tokens(&self) -> u32 {
        self.params.max_tokens.unwrap_or(1024)
    }

    fn convert_tool(tool: &ToolDefinition) -> Tool {
        Tool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.parameters.clone(),
            disable_user_input: None,
            input_examples: None,
            cache_control: None,
        }
    }

    fn extract_text_content(content: &[ContentBlock]) -> String {
        content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn extract_tool_calls(content: &[ContentBlock]) -> Vec<ToolCall> {
        content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse {
                    id, name, input, ..
                } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    fn stop_reason_to_string(reason: Option<StopReason>) -> String {
        match reason {
            Some(StopReason::EndTurn) => "end_turn".to_string(),
            Some(StopReason::MaxTokens) => "max_tokens".to_string(),
            Some(StopReason::StopSequence) => "stop_sequence".to_string(),
            Some(StopReason::ToolUse) => "tool_use".to_string(),
            Some(StopReason::PauseTurn) => "pause_turn".to_string(),
            None => "stop".to_string(),
        }
    }

    /// Split a tool-calling conversation into a system prompt and Claude messages.
    fn convert_conversation(messages: &[ConversationMessage]) -> (Option<String>, Vec<Message>) {
        let mut system = None;
        let mut converted = Vec::with_capacity(messages.len());

        for message in messages {
            match message.role {
                MessageRole::System => system = Some(message.content.clone()),
                MessageRole::User => converted.push(Message::user(message.content.clone())),
                MessageRole::Assistant => {
                    let mut text = message.content.clone();
                    for call in &message.tool_calls {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(&format!(
                            "Calling tool {} ({}) with {}",
                            call.name, call.id, call.arguments
                        ));
                    }
                    if !text.is_empty() {
                        converted.push(Message::assistant(text));
                    }
                }
                MessageRole::Tool => converted.push(Message::user(format!(
                    "Tool result for {}: {}",
                    message.tool_call_id.as_deref().unwrap_or("unknown"),
                    message.content
                ))),
            }
        }

        (system, converted)
    }

    fn build_request(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Tool>>,
        system: Option<&str>,
    ) -> MessagesRequest {
        let mut request = MessagesRequest::new(self.model.clone(), self.max_tokens(), messages);

        if let Some(temp) = self.params.temperature {
            request = request.with_temperature(temp);
        }
        if let Some(sys) = system {
            request = request.with_system(sys.to_string());
        }
        if let Some(t) = tools {
            request = request.with_tools(t);
        }

        request
    }

    async fn send_text(&self, request: MessagesRequest) -> Result<String> {
        let response = self
            .client
            .send_message(request)
            .await
            .map_err(|e| AppError::LLM(format!("Anthropic API error: {}", e)))?;

        Ok(Self::extract_text_content(&response.content))
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(vec![Message::user(prompt.to_string())], None, None);
        self.send_text(request).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let request =
            self.build_request(vec![Message::user(prompt.to_string())], None, Some(system));
        self.send_text(request).await
    }

    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
        let mut system_prompt: Option<String> = None;
        let claude_messages: Vec<Message> = messages
            .iter()
            .filter_map(|(role, content)| match role.as_str() {
                "system" => {
                    system_prompt = Some(content.clone());
                    None
                }
                "assistant" => Some(Message::assistant(content.clone())),
                _ => Some(Message::user(content.clone())),
            })
            .collect();

        let request = self.build_request(claude_messages, None, system_prompt.as_deref());
        self.send_text(request).await
    }

    #[instrument(skip(self, messages, tools), fields(model = %self.model, tools = tools.len()))]
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let (system, claude_messages) = Self::convert_conversation(messages);
        let claude_tools = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(Self::convert_tool).collect())
        };
        let request = self.build_request(claude_messages, claude_tools, system.as_deref());

        let response = self
            .client
            .send_message(request)
            .await
            .map_err(|e| AppError::LLM(format!("Anthropic API error: {}", e)))?;

        Ok(LLMResponse {
            content: Self::extract_text_content(&response.content),
            tool_calls: Self::extract_tool_calls(&response.content),
            finish_reason: Self::stop_reason_to_string(response.stop_reason),
            usage: Some(TokenUsage::new(
                response.usage.input_tokens as u32,
                response.usage.output_tokens as u32,
            )),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_params() {
        let client = AnthropicClient::with_params(
            "test-key".to_string(),
            "claude-sonnet-4-20250514".to_string(),
            ModelParams {
                temperature: Some(0.7),
                max_tokens: Some(2048),
            },
        );

        assert_eq!(client.model_name(), "claude-sonnet-4-20250514");
        assert_eq!(client.max_tokens(), 2048);
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDefinition {
            name: "get_airport_code".to_string(),
            description: "Look up an IATA airport code".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {"city": {"type": "string"}},
                "required": ["city"]
            }),
        };

        let claude_tool = AnthropicClient::convert_tool(&tool);
        assert_eq!(claude_tool.name, "get_airport_code");
        assert_eq!(claude_tool.description, "Look up an IATA airport code");
    }

    #[test]
    fn test_conversation_flattens_tool_results() {
        let call = ToolCall {
            id: "toolu_1".to_string(),
            name: "get_city_code".to_string(),
            arguments: serde_json::json!({"city": "Makkah"}),
        };
        let messages = vec![
            ConversationMessage::system("You are a hotel agent"),
            ConversationMessage::user("Find hotels"),
            ConversationMessage::assistant("", vec![call]),
            ConversationMessage::tool_result("toolu_1", &serde_json::json!("MEC")),
        ];

        let (system, converted) = AnthropicClient::convert_conversation(&messages);
        assert_eq!(system.as_deref(), Some("You are a hotel agent"));
        assert_eq!(converted.len(), 3);
    }

    #[test]
    fn test_stop_reason_conversion() {
        assert_eq!(
            AnthropicClient::stop_reason_to_string(Some(StopReason::ToolUse)),
            "tool_use"
        );
        assert_eq!(AnthropicClient::stop_reason_to_string(None), "stop");
    }
}
