// ABOUTME: Main application entry point.
// ABOUTME: Reads a dashboard document, lays it out, verifies it, and writes Grafana JSON.

mod compose;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridboard_core::{Config, Dashboard, DashboardDocument};
use tracing_subscriber::EnvFilter;

use compose::compose;

/// Lay out dashboard documents and emit Grafana JSON
#[derive(Parser, Debug)]
#[command(name = "gridboard", version, about)]
struct Cli {
    /// Dashboard document (TOML)
    document: PathBuf,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Skip datasource and layout verification
    #[arg(long)]
    no_verify: bool,

    /// Config file (default: ~/.config/gridboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build(document: &DashboardDocument, config: &Config, verify: bool) -> Result<Dashboard> {
    let dashboard = document.dashboard(compose(document)?);
    if verify {
        if config.verify_datasources {
            dashboard.verify_datasources()?;
        }
        if config.verify_layout {
            dashboard.verify_layout()?;
        }
    }
    Ok(dashboard)
}

fn render(dashboard: &Dashboard, pretty: bool) -> Result<String> {
    let json = dashboard.to_json();
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(),
    };
    tracing::debug!("Using config: {:?}", config);

    let document = DashboardDocument::load(&cli.document)
        .with_context(|| format!("Failed to load {}", cli.document.display()))?;
    let dashboard = build(&document, &config, !cli.no_verify)
        .with_context(|| format!("Invalid dashboard `{}`", document.title))?;
    let json = render(&dashboard, config.pretty && !cli.compact)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} panels to {}", dashboard.panels.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting gridboard");
    run(&cli)
}
