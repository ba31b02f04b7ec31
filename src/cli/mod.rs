//! CLI module: command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()`.

pub mod analyze;
pub mod config;
pub mod models;
pub mod serve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use scanbrief::config::Config;

#[derive(Parser)]
#[command(name = "scanbrief")]
#[command(version)]
#[command(about = "AI security summaries for host-scan data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Address to bind (overrides gateway.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides gateway.port and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze scan data from a file or stdin
    Analyze {
        /// Input file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Model key (see `scanbrief models`)
        #[arg(short, long)]
        model: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the models callers may request
    Models,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Check configuration for errors and warnings
    Check,
}

fn load_config() -> Result<Config> {
    Config::load().with_context(|| format!("Failed to load {}", Config::path().display()))
}

/// Entry point for the CLI: called from main().
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging follows the config file when it parses; a broken file is
    // reported by the command that needs it.
    let logging_cfg = Config::load().map(|c| c.logging).unwrap_or_default();
    scanbrief::utils::logging::init_logging(&logging_cfg)
        .context("Failed to initialize logging")?;

    let cli = Cli::parse();

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
        }
        Some(Commands::Version) => {
            cmd_version();
        }
        Some(Commands::Serve { host, port }) => {
            serve::cmd_serve(load_config()?, host, port).await?;
        }
        Some(Commands::Analyze { file, model, json }) => {
            analyze::cmd_analyze(load_config()?, file, model, json).await?;
        }
        Some(Commands::Models) => {
            models::cmd_models(&load_config()?)?;
        }
        Some(Commands::Config { action }) => {
            config::cmd_config(action)?;
        }
    }

    Ok(())
}

/// Display version information
fn cmd_version() {
    println!("scanbrief {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("AI security summaries for host-scan data");
}
