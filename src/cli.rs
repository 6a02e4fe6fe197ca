//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RescueDaemon - multi-agent rescue mission coordinator
#[derive(Parser)]
#[command(
    name = "rd",
    about = "Coordinate UAV and boat agents on a sea rescue mission",
    version,
    after_help = "Logs are written to: ~/.local/share/rescuedaemon/logs/rescuedaemon.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run a complete in-process mission and print its events
    Demo {
        /// Number of victims (defaults to mission.total-victims)
        #[arg(long)]
        victims: Option<u32>,

        /// Reject assignments to agents without the capability
        #[arg(long)]
        enforce_capabilities: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Send a command to an agent in the simulator
    Command {
        /// Agent id
        #[arg(value_name = "AGENT")]
        agent: String,

        /// Command name (scout, move, ...)
        #[arg(value_name = "COMMAND")]
        command: String,

        /// Command parameter as key=value (repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Print the simulator's agent snapshot
    Positions,
}

/// Output format for demo events
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" | "jsonl" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Path of the log file written by `rd`
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rescuedaemon")
        .join("logs")
        .join("rescuedaemon.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["rd"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_demo_defaults() {
        let cli = Cli::parse_from(["rd", "demo"]);
        if let Some(Command::Demo {
            victims,
            enforce_capabilities,
            format,
        }) = cli.command
        {
            assert!(victims.is_none());
            assert!(!enforce_capabilities);
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Demo command");
        }
    }

    #[test]
    fn test_cli_parse_demo_flags() {
        let cli = Cli::parse_from([
            "rd",
            "demo",
            "--victims",
            "4",
            "--enforce-capabilities",
            "--format",
            "json",
        ]);
        assert!(matches!(
            cli.command,
            Some(Command::Demo {
                victims: Some(4),
                enforce_capabilities: true,
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_cli_parse_command_with_params() {
        let cli = Cli::parse_from(["rd", "command", "uav_1", "move", "-p", "x=10", "--param", "y=20"]);
        if let Some(Command::Command { agent, command, params }) = cli.command {
            assert_eq!(agent, "uav_1");
            assert_eq!(command, "move");
            assert_eq!(params, vec!["x=10".to_string(), "y=20".to_string()]);
        } else {
            panic!("Expected Command command");
        }
    }

    #[test]
    fn test_cli_parse_positions() {
        let cli = Cli::parse_from(["rd", "positions"]);
        assert!(matches!(cli.command, Some(Command::Positions)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["rd", "-c", "/path/to/config.yml", "positions", "-v"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("rescuedaemon/logs/rescuedaemon.log"));
    }
}
