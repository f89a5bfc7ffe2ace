//! Init command implementation
//!
//! Scaffolds `umrah.toml`, `.env.example` and `.gitignore`.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    Success,
    /// `umrah.toml` exists and `--force` was not given
    AlreadyExists,
    Error(String),
}

/// Options for the init command
pub struct InitConfig {
    pub path: PathBuf,
    pub force: bool,
    /// LLM provider to configure: openai, anthropic or both
    pub provider: String,
    pub host: String,
    pub port: u16,
    /// Configure the hosted agent runtime instead of in-process agents
    pub remote: bool,
}

pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Umrah Planner");

    let base_path = &config.path;
    let config_path = base_path.join("umrah.toml");
    if config_path.exists() && !config.force {
        output.warning("umrah.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
        output.created_dir(&base_path.display().to_string());
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &generate_umrah_toml(&config), config.force) {
        output.error(&format!("Failed to create umrah.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "umrah.toml");

    let env_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_path, &generate_env_example(&config), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, GITIGNORE, false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("Umrah Planner initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set UMRAH_API_KEY and your provider key");
    output.newline();
    output.info("2. Check the configuration:");
    output.command("umrah-planner config --validate");
    output.newline();
    output.info("3. Start the server:");
    output.command("umrah-planner serve");

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("Set planner.demo_mode = false to plan with live agents");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

const OPENAI_PROVIDER: &str = r#"# OpenAI API (set OPENAI_API_KEY in .env)
[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
default_model = "gpt-4o-mini"
"#;

const ANTHROPIC_PROVIDER: &str = r#"# Anthropic API (set ANTHROPIC_API_KEY in .env, build with --features anthropic)
[providers.anthropic]
type = "anthropic"
api_key_env = "ANTHROPIC_API_KEY"
default_model = "claude-sonnet-4-5"
"#;

fn generate_umrah_toml(config: &InitConfig) -> String {
    let (provider_section, model_provider, model_name) = match config.provider.as_str() {
        "anthropic" => (ANTHROPIC_PROVIDER.to_string(), "anthropic", "claude-sonnet-4-5"),
        "both" => (
            format!("{}\n{}", OPENAI_PROVIDER, ANTHROPIC_PROVIDER),
            "openai",
            "gpt-4o-mini",
        ),
        _ => (OPENAI_PROVIDER.to_string(), "openai", "gpt-4o-mini"),
    };

    let runtime_section = if config.remote {
        r#"[runtime]
mode = "remote"
region = "us-west-2"

[runtime.agents]
orchestrator = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_orchestrator"
flight = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_flight_agent"
hotel = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_hotel_agent"
visa = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_visa_agent"
itinerary = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_itinerary_agent"

[runtime.oauth]
token_endpoint = "https://example.auth.us-west-2.amazoncognito.com/oauth2/token"
client_id_env = "RUNTIME_CLIENT_ID"
client_secret_env = "RUNTIME_CLIENT_SECRET"
"#
    } else {
        r#"[runtime]
mode = "local"
"#
    };

    format!(
        r#"# Umrah Planner Configuration
# ===========================
# Generated by: umrah-planner init
#
# Secrets are read from the environment variables named by the *_env keys.
# Changes to this file are picked up without restarting the server.

# =============================================================================
# Server
# =============================================================================
[server]
host = "{host}"
port = {port}
log_level = "info"
log_format = "pretty"

[auth]
api_key_env = "UMRAH_API_KEY"

# =============================================================================
# LLM Providers and Models
# =============================================================================
{provider_section}
[models.planner]
provider = "{model_provider}"
model = "{model_name}"
temperature = 0.7
max_tokens = 4096

[models.specialist]
provider = "{model_provider}"
model = "{model_name}"
temperature = 0.5
max_tokens = 2048

# =============================================================================
# Agents (system prompts default to the built-in ones)
# =============================================================================
[agents.orchestrator]
model = "planner"
tools = ["search_flights_agent", "search_hotels_agent", "get_visa_info", "create_itinerary"]
max_tool_iterations = 10

[agents.flight]
model = "specialist"
tools = ["search_flights", "get_airport_code"]

[agents.hotel]
model = "specialist"
tools = ["search_hotels", "get_city_code"]

[agents.visa]
model = "specialist"

[agents.itinerary]
model = "specialist"

[tools.search_flights]
timeout_secs = 60

[tools.search_hotels]
timeout_secs = 60

# =============================================================================
# Agent Runtime
# =============================================================================
{runtime_section}
# =============================================================================
# Travel APIs
# =============================================================================
[travel]
flight_backend = "amadeus"
hotel_backend = "amadeus"

[amadeus]
base_url = "https://test.api.amadeus.com"
api_key_env = "AMADEUS_API_KEY"
api_secret_env = "AMADEUS_API_SECRET"
currency = "USD"

# =============================================================================
# Planner
# =============================================================================
[planner]
demo_mode = true
min_advance_days = 30
min_trip_days = 7
max_travelers = 20
"#,
        host = config.host,
        port = config.port,
        provider_section = provider_section,
        model_provider = model_provider,
        model_name = model_name,
        runtime_section = runtime_section,
    )
}

fn generate_env_example(config: &InitConfig) -> String {
    let mut content = String::from(
        r#"# Umrah Planner Environment Variables
# ===================================
# Copy this file to .env and fill in the values.

# REQUIRED: API key for the protected HTTP routes
UMRAH_API_KEY=change-me

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,umrah=debug

"#,
    );

    if config.provider != "anthropic" {
        content.push_str("OPENAI_API_KEY=sk-...\n");
    }
    if config.provider == "anthropic" || config.provider == "both" {
        content.push_str("ANTHROPIC_API_KEY=sk-ant-...\n");
    }

    content.push_str(
        r#"
# Amadeus self-service API (https://developers.amadeus.com)
AMADEUS_API_KEY=
AMADEUS_API_SECRET=

# Optional: Booking.com through RapidAPI (travel.hotel_backend = "booking")
# BOOKING_API_KEY=
"#,
    );

    if config.remote {
        content.push_str(
            r#"
# Agent runtime OAuth client
RUNTIME_CLIENT_ID=
RUNTIME_CLIENT_SECRET=
"#,
        );
    }

    content
}

const GITIGNORE: &str = r#"# Environment
.env
.env.local

# Rust
/target/

# IDE
.idea/
.vscode/
*.swp

# OS
.DS_Store
"#;
