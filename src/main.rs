use anyhow::{Context, Result};
use market_dashboard::{ui, DashboardConfig, MarketTracker};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = DashboardConfig::from_env()?;
    init_logging(&config)?;

    tracing::info!(
        api = %config.api_base_url,
        currency = %config.vs_currency,
        refresh_secs = config.refresh_interval.as_secs(),
        "Starting market dashboard"
    );

    let tracker = MarketTracker::new(&config).context("failed to build HTTP client")?;
    ui::run(&tracker).await
}

/// Logs go to a file when one is configured; the terminal is the UI
fn init_logging(config: &DashboardConfig) -> Result<()> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
