mod cli;

use std::path::PathBuf;

use anyhow::Result;
use carelog::config::CarelogConfig;
use carelog::server;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carelog", version, about = "Resident observation tool server")]
struct Cli {
    /// Config file (defaults to ~/.carelog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Serve the MCP tools over stdio
    Stdio,
    /// Print every resident with their observations
    Residents {
        /// Max observations shown per resident
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print recent observations for one resident
    Query {
        resident_name: String,
        #[arg(long)]
        since_days: Option<u32>,
    },
    /// Save an observation
    Log { resident_name: String, note: String },
    /// Check database health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CarelogConfig::load_from(path)?,
        None => CarelogConfig::load()?,
    };

    // stderr keeps stdout clean for the stdio transport
    let filter =
        EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve_http(config).await?,
        Command::Stdio => server::serve_stdio(config).await?,
        Command::Residents { limit } => cli::residents::residents(&config, limit)?,
        Command::Query {
            resident_name,
            since_days,
        } => cli::query::query(&config, &resident_name, since_days)?,
        Command::Log {
            resident_name,
            note,
        } => cli::log::log(&config, &resident_name, &note)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
