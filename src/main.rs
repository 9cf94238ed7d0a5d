use std::path::Path;

use dotenv::dotenv;
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chainhook_monitor::config::AppConfig;
use chainhook_monitor::monitor;
use chainhook_monitor::report::REPORT_PATH;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Starting Chainhook Monitor");

    let config = AppConfig::new().wrap_err("Failed to load config")?;

    info!("Configuration Loaded:");
    info!("  Contract: {}", config.contract_id());
    info!("  Network: {}", config.stacks_network);
    info!("  API URL: {}", config.stacks_api_url);

    // Fetch failures degrade to an empty report; only a failed report
    // write reaches here and exits non-zero.
    monitor::run(&config, Path::new(REPORT_PATH)).await?;

    Ok(())
}
