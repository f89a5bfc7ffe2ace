//! Provider Registry for managing multiple LLM providers
//!
//! Resolves `[models.<name>]` entries to their `[providers.<name>]` and creates
//! clients for them.

use crate::llm::client::{LLMClient, LLMClientFactoryTrait, Provider};
use crate::types::{AppError, Result};
use crate::utils::toml_config::{ModelConfig, ProviderConfig, UmrahConfig};
use async_trait::async_trait;
use std::collections::HashMap;

/// Registry for managing multiple named LLM providers
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
    models: HashMap<String, ModelConfig>,
    /// Model used when an agent has no `[agents]` entry
    default_model: Option<String>,
}

impl ProviderRegistry {
    /// Create a provider registry from TOML configuration
    pub fn from_config(config: &UmrahConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            models: config.models.clone(),
            default_model: config.default_model().map(str::to_string),
        }
    }

    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Resolve the model -> provider chain without creating a client
    pub fn resolve(&self, model_name: &str) -> Result<Provider> {
        let model_config = self.models.get(model_name).ok_or_else(|| {
            AppError::Configuration(format!("Model '{}' not found in configuration", model_name))
        })?;

        let provider_config = self.providers.get(&model_config.provider).ok_or_else(|| {
            AppError::Configuration(format!(
                "Provider '{}' referenced by model '{}' not found",
                model_config.provider, model_name
            ))
        })?;

        Provider::from_model_config(model_config, provider_config)
    }

    /// Create an LLM client for a specific model by name
    pub fn create_client_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
        self.resolve(model_name)?.create_client()
    }

    /// Create an LLM client using the default model
    pub fn create_default_client(&self) -> Result<Box<dyn LLMClient>> {
        let model_name = self
            .default_model()
            .ok_or_else(|| AppError::Configuration("No models defined in configuration".into()))?;

        self.create_client_for_model(model_name)
    }
}

#[async_trait]
impl LLMClientFactoryTrait for ProviderRegistry {
    async fn create_for_model(&self, model_name: &str) -> Result<Box<dyn LLMClient>> {
        self.create_client_for_model(model_name)
    }

    async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        self.create_default_client()
    }
}
