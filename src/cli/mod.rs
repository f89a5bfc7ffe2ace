//! Command-line interface for the `umrah-planner` binary.
//!
//! Argument parsing uses clap; colored terminal output uses owo-colors.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::types::AgentType;

/// Umrah Planner - multi-agent pilgrimage trip planning
#[derive(Parser, Debug)]
#[command(
    name = "umrah-planner",
    version,
    about = "Umrah Planner - multi-agent pilgrimage trip planning",
    long_about = "Plans Umrah trips with an orchestrator agent and flight, hotel, visa and\n\
                  itinerary specialists, and serves the planning wizard over HTTP.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  umrah-planner init                        # Scaffold umrah.toml and .env.example\n    \
                  umrah-planner                             # Start the server (requires umrah.toml)\n    \
                  umrah-planner agent list                  # Show configured agents\n    \
                  umrah-planner invoke visa \"UK passport\"   # Ask one agent directly\n    \
                  umrah-planner plan trip.json --mock       # Print a sample plan for a request"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "umrah.toml", global = true, env = "UMRAH_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,

    /// Create umrah.toml, .env.example and .gitignore
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure
        #[arg(long, value_enum, default_value_t = InitProvider::Openai)]
        provider: InitProvider,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Run agents on the hosted agent runtime
        #[arg(long)]
        remote: bool,
    },

    /// Show configuration information
    Config {
        /// Check references between sections and print warnings
        #[arg(long)]
        validate: bool,
    },

    /// Inspect agents
    #[command(subcommand)]
    Agent(AgentCommands),

    /// List the tools exposed by the MCP tool gateway
    Tools,

    /// Send one prompt to an agent and print its answer
    Invoke {
        /// Agent to invoke
        #[arg(value_parser = parse_agent)]
        agent: AgentType,

        /// Prompt text
        prompt: String,

        /// Session id to continue a conversation
        #[arg(long)]
        session: Option<String>,
    },

    /// Generate a plan for a trip request stored as JSON
    Plan {
        /// Trip request file (same shape as POST /api/generate-trip)
        file: PathBuf,

        /// Use built-in sample data instead of calling agents
        #[arg(long)]
        mock: bool,

        /// Write the generated trip as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Agent subcommands
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List all agents with their model and tools
    List,

    /// Show details for one agent
    Show {
        #[arg(value_parser = parse_agent)]
        name: AgentType,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitProvider {
    Openai,
    Anthropic,
    Both,
}

impl InitProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            InitProvider::Openai => "openai",
            InitProvider::Anthropic => "anthropic",
            InitProvider::Both => "both",
        }
    }
}

fn parse_agent(s: &str) -> Result<AgentType, String> {
    s.parse::<AgentType>().map_err(|e| e.to_string())
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["umrah-planner"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("umrah.toml"));
    }

    #[test]
    fn test_invoke_parses_agent() {
        let cli = Cli::try_parse_from([
            "umrah-planner",
            "invoke",
            "visa",
            "UK passport holder",
            "--session",
            "abc",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Invoke {
                agent,
                prompt,
                session,
            }) => {
                assert_eq!(agent, AgentType::Visa);
                assert_eq!(prompt, "UK passport holder");
                assert_eq!(session.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["umrah-planner", "tools", "--no-color"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tools)));
        assert!(cli.no_color);
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        assert!(Cli::try_parse_from(["umrah-planner", "agent", "show", "taxi"]).is_err());
    }

    #[test]
    fn test_init_flags() {
        let cli = Cli::try_parse_from([
            "umrah-planner",
            "init",
            "site",
            "--provider",
            "anthropic",
            "--remote",
            "--port",
            "8080",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Init {
                path,
                provider,
                remote,
                port,
                ..
            }) => {
                assert_eq!(path, PathBuf::from("site"));
                assert_eq!(provider.as_str(), "anthropic");
                assert!(remote);
                assert_eq!(port, 8080);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
