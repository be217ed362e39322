use clap::Parser;
use std::path::PathBuf;

use image_relay::config::{resolve_config, ConfigOverrides};
use image_relay::lifecycle::startup;
use image_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "image-relay", version)]
#[command(about = "Relays image URLs to the tile generation service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Downstream endpoint URL
    #[arg(long, env = "DOWNSTREAM_URL")]
    downstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            port: cli.port,
            downstream: cli.downstream,
        },
    )?;

    init_logging(&config.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "image-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        downstream = %config.downstream.endpoint,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
