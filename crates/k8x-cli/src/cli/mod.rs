//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use k8x_core::config;
use k8x_core::logging::{self, LogTarget};

mod commands;

#[derive(Parser)]
#[command(name = "k8x")]
#[command(version = "0.1")]
#[command(about = "Render k8x charts into Kubernetes manifests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (passed to the chart evaluator, enables debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render a chart and apply it with kubectl, or preview it
    Render {
        /// Path to the chart
        #[arg(value_name = "CHART")]
        chart: Option<PathBuf>,

        /// Show the rendered manifests in a pager instead of applying them
        #[arg(short, long)]
        interactive: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

/// Bad invocation; help has been printed and the process exits with 255.
#[derive(Debug)]
pub struct UsageError;

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid usage")
    }
}

impl std::error::Error for UsageError {}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(
        cli.command,
        Commands::Render {
            interactive: true,
            ..
        }
    );
    let target = if interactive {
        LogTarget::File(config::paths::log_path())
    } else {
        LogTarget::Stderr
    };
    logging::init(&target, if cli.verbose { "debug" } else { "warn" });

    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, verbose } = cli;

    match command {
        Commands::Render { chart, interactive } => {
            let Some(chart) = chart else {
                print_render_help()?;
                return Err(UsageError.into());
            };
            let config = config::Config::load().context("load config")?;
            commands::render::run(&commands::render::RenderOptions {
                chart: &chart,
                interactive,
                verbose,
                config: &config,
            })
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}

fn print_render_help() -> Result<()> {
    let mut cmd = Cli::command();
    let render = cmd
        .find_subcommand_mut("render")
        .context("render subcommand is not registered")?;
    render
        .print_help()
        .context("Failed to print render help")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from(["k8x", "-v", "render", "-i", "chart.yaml"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Render { chart, interactive } => {
                assert_eq!(chart, Some(PathBuf::from("chart.yaml")));
                assert!(interactive);
            }
            Commands::Config { .. } => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_chart_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["k8x", "render"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render {
                chart: None,
                interactive: false
            }
        ));
    }
}
