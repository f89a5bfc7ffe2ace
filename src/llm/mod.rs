//! LLM Provider Clients and Abstractions
//!
//! Agents never talk to a provider SDK directly. They hold a
//! `Box<dyn LLMClient>` created from configuration:
//!
//! - [`LLMClient`] - the trait every provider implements
//! - [`ProviderRegistry`] - resolves `[models]` to `[providers]` and creates clients
//! - [`ToolCoordinator`] - the multi-turn tool-calling loop
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI API and compatible endpoints (default)
//! - `anthropic` - Anthropic Claude
//!
//! # Example
//!
//! ```ignore
//! use umrah::llm::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&config);
//! let client = registry.create_client_for_model("default")?;
//! let reply = client.generate_with_system("You plan Umrah trips.", "Hi").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Multi-turn tool calling loop.
pub mod coordinator;
/// Registry for managing multiple LLM provider instances.
pub mod provider_registry;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub mod anthropic;

pub use client::{LLMClient, LLMClientFactoryTrait, LLMResponse, ModelParams, Provider, TokenUsage};
pub use coordinator::{
    ConversationMessage, CoordinatorResult, FinishReason, ToolCallingConfig, ToolCoordinator,
};
pub use provider_registry::ProviderRegistry;
