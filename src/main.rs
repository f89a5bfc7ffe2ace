//! `umrah-planner` binary: HTTP server and command-line tools.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use umrah::cli::init::{self, InitConfig, InitResult};
use umrah::cli::output::Output;
use umrah::cli::{AgentCommands, Cli, Commands};
use umrah::gateway::GatewayClient;
use umrah::types::{AgentType, GeneratedTrip, TripRequest};
use umrah::utils::toml_config::{LogFormat, UmrahConfig};
use umrah::{api, AgentInvoker, AppState, ConfigManager, TripPlanner};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        None | Some(Commands::Serve) => serve(&cli.config, cli.verbose).await,
        Some(Commands::Init {
            path,
            force,
            provider,
            host,
            port,
            remote,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    provider: provider.as_str().to_string(),
                    host,
                    port,
                    remote,
                },
                &output,
            );
            match result {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        Some(Commands::Agent(command)) => agent_info(&cli.config, command, &output),
        Some(Commands::Tools) => {
            init_tracing("warn", LogFormat::Pretty, cli.verbose);
            gateway_tools(&cli.config, &output).await
        }
        Some(Commands::Invoke {
            agent,
            prompt,
            session,
        }) => {
            init_tracing("warn", LogFormat::Pretty, cli.verbose);
            invoke(&cli.config, agent, &prompt, session.as_deref(), &output).await
        }
        Some(Commands::Plan { file, mock, output: out }) => {
            init_tracing("warn", LogFormat::Pretty, cli.verbose);
            plan(&cli.config, &file, mock, out.as_deref(), &output).await
        }
    }
}

fn init_tracing(default_level: &str, format: LogFormat, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("umrah=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("umrah={0},tower_http={0}", default_level).into())
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn load_config(path: &Path) -> Result<UmrahConfig> {
    UmrahConfig::load(path).with_context(|| {
        format!(
            "Failed to load {} (run 'umrah-planner init' to create one)",
            path.display()
        )
    })
}

async fn serve(config_path: &Path, verbose: bool) -> Result<()> {
    let mut config_manager = ConfigManager::new(config_path).with_context(|| {
        format!(
            "Failed to load {} (run 'umrah-planner init' to create one)",
            config_path.display()
        )
    })?;
    let config = config_manager.config();
    init_tracing(&config.server.log_level, config.server.log_format, verbose);

    info!("Starting Umrah Planner v{}", env!("CARGO_PKG_VERSION"));
    if !Path::new(".env").exists() {
        warn!(".env file not found; secrets must come from the environment");
    }

    match config.validate_with_warnings() {
        Ok(warnings) => {
            for warning in warnings {
                warn!("{}", warning);
            }
        }
        Err(e) => warn!("Configuration check failed: {}", e),
    }

    if let Err(e) = config_manager.start_watching() {
        warn!("Config hot-reload disabled: {}", e);
    }

    let state = AppState::from_config(Arc::new(config_manager))?;
    info!(
        runtime = ?config.runtime.mode,
        demo_mode = state.planner().is_demo(),
        "Agents ready"
    );

    let app = api::create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn show_config(path: &Path, validate: bool, output: &Output) -> Result<()> {
    let config = load_config(path)?;

    output.header("Configuration");
    output.kv("File", &path.display().to_string());
    output.kv(
        "Server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("Runtime", &format!("{:?}", config.runtime.mode));
    output.kv(
        "Planner",
        if config.planner.demo_mode {
            "demo (sample data)"
        } else {
            "live agents"
        },
    );
    output.kv("Flights", &format!("{:?}", config.travel.flight_backend));
    output.kv("Hotels", &format!("{:?}", config.travel.hotel_backend));

    output.subheader("Providers");
    for (name, provider) in &config.providers {
        output.list_item(&format!("{} ({})", name, provider.api_key_env()));
    }
    output.subheader("Models");
    for (name, model) in &config.models {
        output.list_item(&format!("{}: {}/{}", name, model.provider, model.model));
    }

    if validate {
        output.subheader("Validation");
        let warnings = config.validate_with_warnings()?;
        if warnings.is_empty() {
            output.success("No problems found");
        }
        for warning in warnings {
            output.warning(&warning.to_string());
        }
    }
    Ok(())
}

fn agent_info(path: &Path, command: AgentCommands, output: &Output) -> Result<()> {
    let config = load_config(path)?;

    match command {
        AgentCommands::List => {
            output.header("Agents");
            output.table_header(&["Agent", "Model", "Tools"]);
            for agent in AgentType::ALL {
                let (model, tools) = match config.get_agent(agent.as_str()) {
                    Some(agent_config) => {
                        (agent_config.model.clone(), agent_config.tools.len().to_string())
                    }
                    None => ("(default)".to_string(), "(default)".to_string()),
                };
                output.table_row(&[agent.as_str(), &model, &tools]);
            }
        }
        AgentCommands::Show { name } => {
            output.header(name.display_name());
            match config.get_agent(name.as_str()) {
                Some(agent_config) => {
                    output.kv("Model", &agent_config.model);
                    if let Some(model) = config.get_model(&agent_config.model) {
                        output.kv("Provider", &model.provider);
                        output.kv("Model name", &model.model);
                    }
                    output.kv(
                        "Max tool iterations",
                        &agent_config.max_tool_iterations.to_string(),
                    );
                    output.subheader("Tools");
                    for tool in &agent_config.tools {
                        output.list_item(tool);
                    }
                    if agent_config.system_prompt.is_some() {
                        output.info("Custom system prompt configured");
                    }
                }
                None => {
                    output.info("Not configured; built-in prompt, tools and default model apply");
                }
            }
            if let Some(arn) = config.runtime.agent_arn(name) {
                output.kv("Runtime ARN", arn);
            }
        }
    }
    Ok(())
}

async fn gateway_tools(path: &Path, output: &Output) -> Result<()> {
    let config = load_config(path)?;
    let Some(gateway) = GatewayClient::from_config(&config.gateway)? else {
        output.warning("No [gateway].url configured");
        return Ok(());
    };

    let tools = gateway.list_tools().await?;
    output.header(&format!("Gateway tools ({})", gateway.url()));
    for tool in &tools {
        match &tool.description {
            Some(description) => output.kv(&tool.name, description),
            None => output.list_item(&tool.name),
        }
    }
    if tools.is_empty() {
        output.info("The gateway exposes no tools");
    }
    Ok(())
}

async fn invoke(
    path: &Path,
    agent: AgentType,
    prompt: &str,
    session: Option<&str>,
    output: &Output,
) -> Result<()> {
    let state = AppState::from_config(Arc::new(ConfigManager::new(path)?))?;
    let response = state.invoker.invoke(agent, prompt, session).await?;
    let text = umrah::runtime::extract_text_from_response(&response);

    output.header(agent.display_name());
    println!("{}", text);
    Ok(())
}

async fn plan(
    path: &Path,
    file: &Path,
    mock: bool,
    out: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let request: TripRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid trip request in {}", file.display()))?;

    let trip: GeneratedTrip = if mock {
        let planner_config = match load_config(path) {
            Ok(config) => config.planner,
            Err(_) => Default::default(),
        };
        TripPlanner::new(None, &planner_config).generate(&request).await
    } else {
        let state = AppState::from_config(Arc::new(ConfigManager::new(path)?))?;
        state.planner().generate(&request).await
    };

    output.trip_summary(&trip);

    if let Some(out) = out {
        std::fs::write(out, serde_json::to_string_pretty(&trip)?)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        output.created("trip", &out.display().to_string());
    }
    Ok(())
}
