use std::{fs::File, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jordan_wells::{
    web::{self, WebServerConfig},
    ConfigLoader, Dashboard, DashboardConfig, DashboardSettings,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Jordan wells dashboard")]
struct Cli {
    /// Path to a YAML config file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Master seed for well point generation
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve,
    /// Evaluate the dashboard once and write the view as JSON
    Snapshot {
        /// Governorate to select, as it would appear in the `gov` query parameter
        #[arg(long)]
        gov: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let dashboard = Dashboard::new(DashboardSettings::from(&config))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            web::run(WebServerConfig {
                dashboard,
                host: config.host,
                port: config.port,
            })
            .await
        }
        Command::Snapshot { gov, output } => snapshot(&dashboard, gov, output),
    }
}

fn snapshot(dashboard: &Dashboard, gov: Option<String>, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let view = dashboard.snapshot(gov.as_deref(), &mut file)?;
            info!("wrote {} snapshot to {}", view.selection, path.display());
        }
        None => {
            dashboard.snapshot(gov.as_deref(), &mut io::stdout().lock())?;
        }
    }
    Ok(())
}
