mod config;
mod content;
mod data;
mod monitoring;
mod pipeline;
mod publishing;

use anyhow::Result;
use config::{Config, EnvConfig};
use monitoring::logger::RunLogger;
use pipeline::mode::today_in;
use pipeline::runner::DailyPostPipeline;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting daily market blog run at {}", chrono::Local::now());

    // Load configuration
    let env_config = EnvConfig::load();
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    let tz = config.timezone()?;

    tracing::info!("Timezone: {}", tz);
    tracing::info!("Dry run mode: {}", config.system.dry_run);
    tracing::info!("Post status: {}", config.publisher.status.as_str());

    let run_logger = if config.monitoring.csv_logging {
        Some(RunLogger::new(config.monitoring.csv_log_path.clone())?)
    } else {
        None
    };

    let pipeline = DailyPostPipeline::new(&config, &env_config);
    let report = pipeline.run(today_in(tz)).await;

    if let Some(logger) = &run_logger {
        if let Err(e) = logger.log_run(&report) {
            tracing::warn!("Failed to write run log: {:#}", e);
        }
    }

    if report.outcome.is_success() {
        tracing::info!("Run finished: {}", report.outcome.label());
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("Run finished: {} ({})", report.outcome.label(), report.outcome.detail());
        Ok(ExitCode::FAILURE)
    }
}
