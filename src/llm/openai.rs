//! OpenAI chat completions client (async-openai).

use crate::llm::client::{LLMClient, LLMResponse, ModelParams, TokenUsage};
use crate::llm::coordinator::{ConversationMessage, MessageRole};
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestToolMessage,
        ChatCompletionRequestToolMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequest,
        CreateChatCompletionResponse, FunctionCall, FunctionObject, ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    params: ModelParams,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self::with_params(api_key, api_base, model, ModelParams::default())
    }

    pub fn with_params(api_key: String, api_base: String, model: String, params: ModelParams) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
            params,
        }
    }

    fn system_message(content: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(content.to_string()),
            name: None,
        }
        .into()
    }

    fn user_message(content: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(content.to_string()),
            name: None,
        }
        .into()
    }

    fn assistant_message(content: &str, tool_calls: &[ToolCall]) -> ChatCompletionRequestMessage {
        let tool_calls = if tool_calls.is_empty() {
            None
        } else {
            Some(
                tool_calls
                    .iter()
                    .map(|call| {
                        ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                    })
                    .collect(),
            )
        };

        let content = if content.is_empty() && tool_calls.is_some() {
            None
        } else {
            Some(ChatCompletionRequestAssistantMessageContent::Text(
                content.to_string(),
            ))
        };

        #[allow(deprecated)]
        ChatCompletionRequestAssistantMessage {
            content,
            name: None,
            tool_calls,
            function_call: None,
            refusal: None,
            audio: None,
        }
        .into()
    }

    fn convert_message(message: &ConversationMessage) -> ChatCompletionRequestMessage {
        match message.role {
            MessageRole::System => Self::system_message(&message.content),
            MessageRole::User => Self::user_message(&message.content),
            MessageRole::Assistant => Self::assistant_message(&message.content, &message.tool_calls),
            MessageRole::Tool => ChatCompletionRequestToolMessage {
                content: ChatCompletionRequestToolMessageContent::Text(message.content.clone()),
                tool_call_id: message.tool_call_id.clone().unwrap_or_default(),
            }
            .into(),
        }
    }

    fn convert_tool(tool: &ToolDefinition) -> ChatCompletionTools {
        ChatCompletionTools::Function(ChatCompletionTool {
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        })
    }

    fn request(&self, messages: Vec<ChatCompletionRequestMessage>) -> CreateChatCompletionRequest {
        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            ..Default::default()
        }
    }

    async fn send(&self, request: CreateChatCompletionRequest) -> Result<CreateChatCompletionResponse> {
        self.client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))
    }

    async fn complete_text(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let response = self.send(self.request(messages)).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete_text(vec![Self::user_message(prompt)]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete_text(vec![Self::system_message(system), Self::user_message(prompt)])
            .await
    }

    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
        let chat_messages = messages
            .iter()
            .map(|(role, content)| match role.as_str() {
                "system" => Self::system_message(content),
                "assistant" => Self::assistant_message(content, &[]),
                _ => Self::user_message(content),
            })
            .collect();

        self.complete_text(chat_messages).await
    }

    #[instrument(skip(self, messages, tools), fields(model = %self.model, tools = tools.len()))]
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let mut request = self.request(messages.iter().map(Self::convert_message).collect());
        if !tools.is_empty() {
            request.tools = Some(tools.iter().map(Self::convert_tool).collect());
            request.tool_choice = Some(ChatCompletionToolChoiceOption::Mode(
                ToolChoiceOptions::Auto,
            ));
        }

        debug!("Sending tool request to OpenAI");
        let response = self.send(request).await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let content = choice.message.content.clone().unwrap_or_default();
        let finish_reason = choice
            .finish_reason
            .as_ref()
            .map(|r| format!("{:?}", r).to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());

        let tool_calls = choice
            .message
            .tool_calls
            .as_ref()
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| match call {
                        ChatCompletionMessageToolCalls::Function(func_call) => Some(ToolCall {
                            id: func_call.id.clone(),
                            name: func_call.function.name.clone(),
                            arguments: serde_json::from_str(&func_call.function.arguments)
                                .unwrap_or(serde_json::json!({})),
                        }),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let usage = response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
            usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
