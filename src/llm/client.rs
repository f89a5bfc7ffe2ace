//! LLM Client abstractions and provider selection
//!
//! Agents talk to language models through the [`LLMClient`] trait:
//! - **OpenAI** (`openai` feature): chat completions with tool calling
//! - **Anthropic** (`anthropic` feature): Claude messages with tool use

use crate::llm::coordinator::ConversationMessage;
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use crate::utils::toml_config::{ModelConfig, ProviderConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing agents to switch
/// providers through configuration alone.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate with conversation history
    async fn generate_with_history(
        &self,
        messages: &[(String, String)], // (role, content) pairs
    ) -> Result<String>;

    /// Generate with tool definitions and a full tool-calling conversation.
    ///
    /// Used by [`ToolCoordinator`](crate::llm::coordinator::ToolCoordinator) for
    /// multi-turn tool calling.
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "end_turn")
    pub finish_reason: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

/// Token counts for one or more requests.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Inference parameters taken from a `[models.<name>]` entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl From<&ModelConfig> for ModelParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible endpoints)
    #[cfg(feature = "openai")]
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Anthropic Claude API provider
    #[cfg(feature = "anthropic")]
    Anthropic {
        api_key: String,
        model: String,
        params: ModelParams,
    },
}

impl Provider {
    /// Resolve a provider from a model entry and the provider it references.
    ///
    /// Reads the provider API key from the environment.
    pub fn from_model_config(model: &ModelConfig, provider: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(provider.api_key_env()).map_err(|_| {
            AppError::Configuration(format!(
                "Environment variable '{}' is not set",
                provider.api_key_env()
            ))
        })?;
        let params = ModelParams::from(model);

        match provider {
            #[cfg(feature = "openai")]
            ProviderConfig::OpenAI { api_base, .. } => Ok(Provider::OpenAI {
                api_key,
                api_base: api_base.clone(),
                model: model.model.clone(),
                params,
            }),
            #[cfg(not(feature = "openai"))]
            ProviderConfig::OpenAI { .. } => {
                let _ = (api_key, params);
                Err(AppError::Configuration(
                    "OpenAI provider requires the 'openai' feature".to_string(),
                ))
            }

            #[cfg(feature = "anthropic")]
            ProviderConfig::Anthropic { .. } => Ok(Provider::Anthropic {
                api_key,
                model: model.model.clone(),
                params,
            }),
            #[cfg(not(feature = "anthropic"))]
            ProviderConfig::Anthropic { .. } => {
                let _ = (api_key, params);
                Err(AppError::Configuration(
                    "Anthropic provider requires the 'anthropic' feature".to_string(),
                ))
            }
        }
    }

    /// Create a client instance for this provider
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::with_params(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                params.clone(),
            ))),

            #[cfg(feature = "anthropic")]
            Provider::Anthropic {
                api_key,
                model,
                params,
            } => Ok(Box::new(super::anthropic::AnthropicClient::with_params(
                api_key.clone(),
                model.clone(),
                params.clone(),
            ))),

            #[allow(unreachable_patterns)]
            _ => Err(AppError::Configuration(
                "No LLM provider feature is enabled".to_string(),
            )),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI { .. } => "OpenAI",
            #[cfg(feature = "anthropic")]
            Provider::Anthropic { .. } => "Anthropic",
            #[allow(unreachable_patterns)]
            _ => "none",
        }
    }
}

/// Creates LLM clients by model name.
///
/// Implemented by [`ProviderRegistry`](crate::llm::ProviderRegistry); tests
/// substitute a factory that hands out scripted clients.
#[async_trait]
pub trait LLMClientFactoryTrait: Send + Sync {
    /// Create a client for a `[models.<name>]` entry
    async fn create_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>>;

    /// Create a client for the default model
    async fn create_default(&self) -> Result<Box<dyn LLMClient>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_model_params_from_config() {
        let config = ModelConfig {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 2048,
        };
        let params = ModelParams::from(&config);
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.max_tokens, Some(2048));
    }

    #[test]
    fn test_missing_api_key_env_is_configuration_error() {
        let model = ModelConfig {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        };
        let provider = ProviderConfig::OpenAI {
            api_key_env: "UMRAH_TEST_OPENAI_KEY_NEVER_SET".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
        };

        match Provider::from_model_config(&model, &provider) {
            Err(AppError::Configuration(msg)) => {
                assert!(msg.contains("UMRAH_TEST_OPENAI_KEY_NEVER_SET"))
            }
            _ => panic!("expected configuration error"),
        }
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_openai_provider_resolution() {
        // SAFETY: Tests are run single-threaded for env var safety
        unsafe {
            std::env::set_var("UMRAH_TEST_OPENAI_KEY", "sk-test");
        }

        let model = ModelConfig {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.5,
            max_tokens: 512,
        };
        let provider = ProviderConfig::OpenAI {
            api_key_env: "UMRAH_TEST_OPENAI_KEY".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
        };

        let resolved = Provider::from_model_config(&model, &provider).unwrap();
        assert_eq!(resolved.name(), "OpenAI");
        let client = resolved.create_client().unwrap();
        assert_eq!(client.model_name(), "gpt-4o");
    }
}
