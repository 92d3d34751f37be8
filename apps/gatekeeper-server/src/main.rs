#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod app;
mod collections;
mod config;
mod registered_providers;

use std::path::PathBuf;

use anyhow::Context;
use api_gateway::ApiGateway;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat, LoggingConfig};

/// Authentication and authorization gateway in front of a collections API.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/gatekeeper.yaml")]
    config: PathBuf,

    /// Log filter, overrides `logging.level` (e.g. `debug`, `api_gateway=trace,info`)
    #[arg(long)]
    log_level: Option<String>,

    /// Listen address, overrides `server.bind_addr`
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config '{}'", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    init_logging(&config.logging)?;
    tracing::info!(config = %cli.config.display(), "Starting gatekeeper server");

    let router = app::build_router(&config)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    cancel.cancel();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
            }
        }
    });

    ApiGateway::serve(router, &config.server.bind_addr, cancel).await
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log filter '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
