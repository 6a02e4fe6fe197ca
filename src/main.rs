//! RescueDaemon - multi-agent rescue mission coordinator
//!
//! CLI entry point for running missions and talking to the simulator.

use std::fs;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use serde_json::Map;
use tracing::info;

use rescuedaemon::cli::{Cli, Command, OutputFormat, get_log_path};
use rescuedaemon::config::Config;
use rescuedaemon::demo::{DemoOptions, DemoReport, run_demo};
use rescuedaemon::events::{EventEmitter, MissionEvent};
use rescuedaemon::gateway::{CommandGateway, HttpSimulationClient, parse_param};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    // Write to the log file, not stdout; fall back to stderr if it cannot be created
    let log_path = get_log_path();
    let log_file = log_path
        .parent()
        .map(fs::create_dir_all)
        .transpose()
        .and_then(|_| fs::File::create(&log_path));

    match log_file {
        Ok(file) => tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(filter)
            .init(),
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
            tracing::warn!(path = %log_path.display(), error = %e, "Failed to create log file, logging to stderr");
        }
    }

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "RescueDaemon loaded config: simulation={}, victims={}",
        config.simulation.base_url, config.mission.total_victims
    );

    match cli.command {
        Some(Command::Demo {
            victims,
            enforce_capabilities,
            format,
        }) => {
            let options = DemoOptions {
                victims: victims.unwrap_or(config.mission.total_victims),
                enforce_capabilities: enforce_capabilities || config.board.enforce_capabilities,
            };
            cmd_demo(&config, &options, format).await
        }
        Some(Command::Command { agent, command, params }) => cmd_command(&config, &agent, &command, &params).await,
        Some(Command::Positions) => cmd_positions(&config).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run the in-process mission and print its events
async fn cmd_demo(config: &Config, options: &DemoOptions, format: OutputFormat) -> Result<()> {
    let report = run_demo(config, options).await.context("Demo mission failed")?;

    match format {
        OutputFormat::Json => {
            for event in &report.events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        OutputFormat::Text => print_text_report(&report),
    }
    Ok(())
}

fn print_text_report(report: &DemoReport) {
    for event in &report.events {
        let kind = format!("{:<22}", event.event_type());
        let kind = match event {
            MissionEvent::MissionCompleted { .. } => kind.green().bold(),
            MissionEvent::VictimDiscovered { .. } | MissionEvent::VictimRescued { .. } => kind.yellow(),
            MissionEvent::TaskCreated { .. } | MissionEvent::TaskCompleted { .. } => kind.cyan(),
            _ => kind.normal(),
        };
        println!("{:<9} {} {}", event.source().dimmed(), kind, event.summary());
    }

    println!();
    let progress = &report.progress;
    let outcome = if progress.mission_complete {
        "MISSION COMPLETE".green().bold()
    } else {
        "MISSION INCOMPLETE".red().bold()
    };
    println!(
        "{}: {}/{} victims rescued ({} found)",
        outcome, progress.rescued_victims, progress.total_victims, report.victims_found
    );
    println!(
        "Tasks: {} total, {} completed, {} agents with capabilities",
        report.stats.total, report.stats.completed, report.stats.agents
    );
}

/// Send one command to the simulator
async fn cmd_command(config: &Config, agent: &str, command: &str, raw_params: &[String]) -> Result<()> {
    let mut params = Map::new();
    for raw in raw_params {
        let (key, value) = parse_param(raw)?;
        params.insert(key, value);
    }

    let client = HttpSimulationClient::from_config(&config.simulation)?;
    let gateway = CommandGateway::new(client, EventEmitter::detached());
    gateway
        .send_command(agent, command, params)
        .await
        .context(format!("Simulator at {} rejected {}", config.simulation.base_url, command))?;

    println!("{} {} {}", "✓".green(), agent, command);
    Ok(())
}

/// Print the simulator's agent snapshot
async fn cmd_positions(config: &Config) -> Result<()> {
    let client = HttpSimulationClient::from_config(&config.simulation)?;
    let gateway = CommandGateway::new(client, EventEmitter::detached());
    let agents = gateway
        .agent_positions()
        .await
        .context(format!("Failed to fetch agents from {}", config.simulation.base_url))?;

    if agents.is_empty() {
        println!("No agents reported");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&agents)?);
    Ok(())
}
