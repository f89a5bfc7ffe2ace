//! TOML-based configuration for the Umrah planner
//!
//! This module provides declarative configuration for providers, models, agents,
//! tools, the agent runtime, the tool gateway and the travel APIs via a TOML file
//! (`umrah.toml`).
//!
//! Secrets are never stored in the file. Every credential is referenced by the
//! name of the environment variable that holds it (`*_env` fields).
//!
//! # Hot Reloading
//!
//! Configuration changes are automatically detected and applied at runtime.
//! Use `ConfigManager` for thread-safe access to the current configuration.

use crate::tools::BUILTIN_TOOL_NAMES;
use crate::types::AgentType;
use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from umrah.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UmrahConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Tool configurations
    #[serde(default)]
    pub tools: HashMap<String, ToolConfig>,

    /// Agent configurations keyed by agent name
    #[serde(default)]
    pub agents: HashMap<String, AgentConfig>,

    /// Hosted agent runtime
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// MCP tool gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub travel: TravelConfig,

    #[serde(default)]
    pub amadeus: AmadeusConfig,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub planner: PlannerConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the API key for protected routes
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    "UMRAH_API_KEY".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
        }
    }
}

/// OAuth2 client-credentials settings shared by the runtime and the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub token_endpoint: String,
    pub client_id_env: String,
    pub client_secret_env: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub method: ClientAuthMethod,
}

/// How client credentials are presented to the token endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientAuthMethod {
    /// HTTP Basic authentication header.
    #[default]
    Basic,
    /// `client_id` and `client_secret` in the form body.
    Form,
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        default_model: String,
    },
    Anthropic {
        /// Environment variable containing API key
        api_key_env: String,
        default_model: String,
    },
}

impl ProviderConfig {
    pub fn api_key_env(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { api_key_env, .. } => api_key_env,
            ProviderConfig::Anthropic { api_key_env, .. } => api_key_env,
        }
    }
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_model_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_model_max_tokens() -> u32 {
    1024
}

// ============= Tool Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_tool_timeout() -> u64 {
    30
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
            timeout_secs: default_tool_timeout(),
        }
    }
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Reference to a model name defined in [models]
    pub model: String,

    /// System prompt override; the built-in prompt is used when absent
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// List of tool names this agent can use
    #[serde(default)]
    pub tools: Vec<String>,

    /// Maximum tool calling iterations
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,

    /// Whether to execute tools in parallel
    #[serde(default)]
    pub parallel_tools: bool,
}

fn default_max_tool_iterations() -> usize {
    10
}

// ============= Agent Runtime Configuration =============

/// Where agents run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Agents run in-process against the configured LLM providers.
    #[default]
    Local,
    /// Agents are invoked on the hosted agent runtime.
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub mode: RuntimeMode,

    #[serde(default = "default_region")]
    pub region: String,

    /// Overrides the regional endpoint (used by tests and proxies)
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Agent name -> runtime ARN
    #[serde(default)]
    pub agents: HashMap<String, String>,

    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
}

fn default_region() -> String {
    "us-west-2".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    300
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::default(),
            region: default_region(),
            endpoint: None,
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            agents: HashMap::new(),
            oauth: None,
        }
    }
}

impl RuntimeConfig {
    /// Base URL of the runtime data plane.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-agentcore.{}.amazonaws.com", self.region),
        }
    }

    pub fn agent_arn(&self, agent: AgentType) -> Option<&str> {
        self.agents.get(agent.as_str()).map(|s| s.as_str())
    }
}

// ============= Gateway Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// MCP endpoint of the tool gateway
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub oauth: Option<OAuthConfig>,

    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

fn default_gateway_timeout() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: None,
            oauth: None,
            timeout_secs: default_gateway_timeout(),
        }
    }
}

// ============= Travel API Configuration =============

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlightBackend {
    #[default]
    Gateway,
    Amadeus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HotelBackend {
    #[default]
    Gateway,
    Amadeus,
    Booking,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelConfig {
    #[serde(default)]
    pub flight_backend: FlightBackend,

    #[serde(default)]
    pub hotel_backend: HotelBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    #[serde(default = "default_amadeus_base")]
    pub base_url: String,

    #[serde(default = "default_amadeus_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_amadeus_secret_env")]
    pub api_secret_env: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_amadeus_base() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_amadeus_key_env() -> String {
    "AMADEUS_API_KEY".to_string()
}

fn default_amadeus_secret_env() -> String {
    "AMADEUS_API_SECRET".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: default_amadeus_base(),
            api_key_env: default_amadeus_key_env(),
            api_secret_env: default_amadeus_secret_env(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_booking_base")]
    pub base_url: String,

    #[serde(default = "default_booking_host")]
    pub host: String,

    #[serde(default = "default_booking_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_booking_base() -> String {
    "https://booking-com.p.rapidapi.com/v1".to_string()
}

fn default_booking_host() -> String {
    "booking-com.p.rapidapi.com".to_string()
}

fn default_booking_key_env() -> String {
    "BOOKING_API_KEY".to_string()
}

fn default_locale() -> String {
    "en-us".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            base_url: default_booking_base(),
            host: default_booking_host(),
            api_key_env: default_booking_key_env(),
            locale: default_locale(),
        }
    }
}

// ============= Planner Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Serve sample plans without calling any agent
    #[serde(default = "default_true")]
    pub demo_mode: bool,

    #[serde(default = "default_min_trip_days")]
    pub min_trip_days: u32,

    #[serde(default = "default_max_trip_days")]
    pub max_trip_days: u32,

    /// Trips longer than this produce a warning
    #[serde(default = "default_warn_trip_days")]
    pub warn_trip_days: u32,

    #[serde(default = "default_min_advance_days")]
    pub min_advance_days: u32,

    #[serde(default = "default_max_travelers")]
    pub max_travelers: u32,

    #[serde(default = "default_min_budget")]
    pub min_budget_per_person: f64,

    #[serde(default = "default_max_budget")]
    pub max_budget_per_person: f64,

    #[serde(default = "default_budget")]
    pub default_budget_per_person: f64,

    #[serde(default = "default_visa_fee")]
    pub visa_fee: u32,

    #[serde(default = "default_service_fee")]
    pub service_fee: u32,

    #[serde(default = "default_discount")]
    pub discount: u32,

    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
}

fn default_min_trip_days() -> u32 {
    7
}

fn default_max_trip_days() -> u32 {
    90
}

fn default_warn_trip_days() -> u32 {
    30
}

fn default_min_advance_days() -> u32 {
    30
}

fn default_max_travelers() -> u32 {
    20
}

fn default_min_budget() -> f64 {
    500.0
}

fn default_max_budget() -> f64 {
    50_000.0
}

fn default_budget() -> f64 {
    3_000.0
}

fn default_visa_fee() -> u32 {
    150
}

fn default_service_fee() -> u32 {
    100
}

fn default_discount() -> u32 {
    200
}

fn default_currencies() -> Vec<String> {
    [
        "USD", "EUR", "GBP", "SAR", "AED", "INR", "PKR", "MYR", "IDR", "TRY", "EGP", "ZAR", "CAD",
        "AUD",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            demo_mode: true,
            min_trip_days: default_min_trip_days(),
            max_trip_days: default_max_trip_days(),
            warn_trip_days: default_warn_trip_days(),
            min_advance_days: default_min_advance_days(),
            max_travelers: default_max_travelers(),
            min_budget_per_person: default_min_budget(),
            max_budget_per_person: default_max_budget(),
            default_budget_per_person: default_budget(),
            visa_fee: default_visa_fee(),
            service_fee: default_service_fee(),
            discount: default_discount(),
            currencies: default_currencies(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    UnusedProvider,
    UnusedModel,
    UnusedTool,
    GatewayNotConfigured,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by agent '{1}' does not exist")]
    MissingModel(String, String),

    #[error("Tool '{0}' referenced by agent '{1}' does not exist")]
    MissingTool(String, String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl UmrahConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: UmrahConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_env_var(&self.auth.api_key_env)?;

        for provider in self.providers.values() {
            self.validate_env_var(provider.api_key_env())?;
        }

        // Validate model -> provider references
        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
        }

        // Validate agent names and agent -> model / tools references
        for (agent_name, agent_config) in &self.agents {
            agent_name.parse::<AgentType>().map_err(|_| {
                ConfigError::ValidationError(format!("Unknown agent '{}' in [agents]", agent_name))
            })?;

            if !self.models.contains_key(&agent_config.model) {
                return Err(ConfigError::MissingModel(
                    agent_config.model.clone(),
                    agent_name.clone(),
                ));
            }

            for tool_name in &agent_config.tools {
                if !self.tools.contains_key(tool_name)
                    && !BUILTIN_TOOL_NAMES.contains(&tool_name.as_str())
                {
                    return Err(ConfigError::MissingTool(
                        tool_name.clone(),
                        agent_name.clone(),
                    ));
                }
            }
        }

        if self.runtime.mode == RuntimeMode::Remote {
            for agent in AgentType::ALL {
                if self.runtime.agent_arn(agent).is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "Remote runtime mode requires an ARN for agent '{}' in [runtime.agents]",
                        agent
                    )));
                }
            }
            if let Some(oauth) = &self.runtime.oauth {
                self.validate_oauth(oauth)?;
            }
        }

        if let Some(oauth) = &self.gateway.oauth {
            self.validate_oauth(oauth)?;
        }

        if self.travel.flight_backend == FlightBackend::Amadeus
            || self.travel.hotel_backend == HotelBackend::Amadeus
        {
            self.validate_env_var(&self.amadeus.api_key_env)?;
            self.validate_env_var(&self.amadeus.api_secret_env)?;
        }

        if self.travel.hotel_backend == HotelBackend::Booking {
            self.validate_env_var(&self.booking.api_key_env)?;
        }

        self.validate_planner()
    }

    fn validate_oauth(&self, oauth: &OAuthConfig) -> Result<(), ConfigError> {
        self.validate_env_var(&oauth.client_id_env)?;
        self.validate_env_var(&oauth.client_secret_env)
    }

    fn validate_planner(&self) -> Result<(), ConfigError> {
        let planner = &self.planner;

        if planner.min_trip_days > planner.max_trip_days {
            return Err(ConfigError::ValidationError(format!(
                "planner.min_trip_days ({}) exceeds planner.max_trip_days ({})",
                planner.min_trip_days, planner.max_trip_days
            )));
        }
        if planner.max_travelers == 0 {
            return Err(ConfigError::ValidationError(
                "planner.max_travelers must be at least 1".to_string(),
            ));
        }
        if planner.min_budget_per_person > planner.max_budget_per_person {
            return Err(ConfigError::ValidationError(format!(
                "planner.min_budget_per_person ({}) exceeds planner.max_budget_per_person ({})",
                planner.min_budget_per_person, planner.max_budget_per_person
            )));
        }
        if planner.currencies.is_empty() {
            return Err(ConfigError::ValidationError(
                "planner.currencies must list at least one currency".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate configuration with warnings for unused items
    ///
    /// Returns Ok with warnings, or Err if validation fails
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(self.check_unused_providers());
        warnings.extend(self.check_unused_models());
        warnings.extend(self.check_unused_tools());
        warnings.extend(self.check_gateway());

        Ok(warnings)
    }

    /// Check for providers that aren't referenced by any model
    fn check_unused_providers(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self.models.values().map(|m| m.provider.as_str()).collect();

        self.providers
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedProvider,
                message: format!(
                    "Provider '{}' is defined but not referenced by any model",
                    name
                ),
            })
            .collect()
    }

    /// Check for models that aren't referenced by any agent
    fn check_unused_models(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self.agents.values().map(|a| a.model.as_str()).collect();

        self.models
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .filter(|name| Some(name.as_str()) != self.default_model())
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedModel,
                message: format!(
                    "Model '{}' is defined but not referenced by any agent",
                    name
                ),
            })
            .collect()
    }

    /// Check for tools that aren't referenced by any agent
    fn check_unused_tools(&self) -> Vec<ConfigWarning> {
        let referenced: HashSet<_> = self
            .agents
            .values()
            .flat_map(|a| a.tools.iter().map(|t| t.as_str()))
            .collect();

        self.tools
            .keys()
            .filter(|name| !referenced.contains(name.as_str()))
            .map(|name| ConfigWarning {
                kind: ConfigWarningKind::UnusedTool,
                message: format!("Tool '{}' is defined but not referenced by any agent", name),
            })
            .collect()
    }

    fn check_gateway(&self) -> Vec<ConfigWarning> {
        let uses_gateway = self.travel.flight_backend == FlightBackend::Gateway
            || self.travel.hotel_backend == HotelBackend::Gateway;

        if uses_gateway && self.gateway.url.is_none() && !self.planner.demo_mode {
            vec![ConfigWarning {
                kind: ConfigWarningKind::GatewayNotConfigured,
                message: "Travel searches use the gateway but [gateway].url is not set".to_string(),
            }]
        } else {
            Vec::new()
        }
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the API key protecting the HTTP API
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.api_key_env.clone()))
    }

    /// Model used by agents without an explicit [agents] entry.
    ///
    /// Prefers a model named `default`, then the alphabetically first one.
    pub fn default_model(&self) -> Option<&str> {
        if self.models.contains_key("default") {
            return Some("default");
        }
        let mut names: Vec<&str> = self.models.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.first().copied()
    }

    /// Get model by name
    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Get agent config by name
    pub fn get_agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.get(name)
    }

    /// Get tool config by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Whether a tool may be registered. Undeclared built-in tools are enabled.
    pub fn tool_enabled(&self, name: &str) -> bool {
        self.get_tool(name).map(|t| t.enabled).unwrap_or(true)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
#[derive(Debug)]
pub struct ConfigManager {
    config: Arc<ArcSwap<UmrahConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl ConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = UmrahConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
            reload_tx: None,
        })
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<UmrahConfig> {
        self.config.load_full()
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = UmrahConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&mut self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.reload_tx = Some(tx.clone());

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);
        let file_name = config_path.file_name().map(|n| n.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the config file's parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload: Option<std::time::Instant> = None;
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|at| at.elapsed() < debounce_duration) {
                    continue;
                }

                // Let the writer finish
                tokio::time::sleep(Duration::from_millis(100)).await;

                match UmrahConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }

    /// Create a config manager directly from a config (useful for testing).
    /// This won't have file watching capabilities.
    pub fn from_config(config: UmrahConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("umrah.toml"),
            watcher: RwLock::new(None),
            reload_tx: None,
        }
    }
}

impl Clone for ConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
            reload_tx: self.reload_tx.clone(),
        }
    }
}
