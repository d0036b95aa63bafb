// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plantwise - closed-system training assistant for plant operators.
//!
//! Binary entry point: loads configuration, sets up tracing and runs the
//! requested subcommand.

mod check;
mod render;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Plantwise - closed-system training assistant for plant operators.
#[derive(Parser, Debug)]
#[command(name = "plantwise", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the XDG hierarchy.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session (the default).
    Shell {
        /// JSON file holding the conversation and audit log between runs.
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Validate configuration and report adapter health.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plantwise_config::load_and_validate_path(path),
        None => plantwise_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plantwise_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.assistant.log_level);

    let result = match cli.command {
        Some(Commands::Check) => check::run_check(&config).await,
        Some(Commands::Shell { history }) => shell::run_shell(config, history).await,
        None => shell::run_shell(config, None).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Log lines go to stderr so they do not interleave with chat output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plantwise={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = plantwise_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.assistant.name, "Plantwise");
    }

    #[test]
    fn cli_defaults_to_shell() {
        let cli = Cli::try_parse_from(["plantwise"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parses_shell_history_and_global_config() {
        let cli = Cli::try_parse_from([
            "plantwise",
            "shell",
            "--history",
            "/tmp/pw.json",
            "--config",
            "/tmp/pw.toml",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Shell { history }) => {
                assert_eq!(history, Some(PathBuf::from("/tmp/pw.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pw.toml")));
    }

    #[test]
    fn cli_parses_check() {
        let cli = Cli::try_parse_from(["plantwise", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
    }
}
