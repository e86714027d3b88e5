use std::path::PathBuf;
use std::time::Instant;

use serde::Deserialize;
use tracing::{error, info};

use coinlab::aggregator::{aggregate_directory, write_series, AggregatorConfig, Interval};
use coinlab::common::constants::DEFAULT_CONFIG_PATH;
use coinlab::logging::{cleanup_old_logs, init_dual_logging, LogRotation, LoggingConfig};

/// Aggregator configuration from config.toml
#[derive(Debug, Clone, Deserialize)]
struct AggregatorTomlConfig {
    pub input_dir: String,
    pub output_file: String,
    pub interval: String,
    pub human_readable: Option<bool>,
}

/// Logging configuration from config.toml
#[derive(Debug, Clone, Deserialize)]
struct LoggingTomlConfig {
    pub log_dir: Option<String>,
    pub level_filter: Option<String>,
    pub rotation: Option<String>, // "daily" or "hourly"
    pub console_timestamps: Option<bool>,
    pub file_json_format: Option<bool>,
    pub cleanup_days: Option<u32>,
}

/// Full TOML configuration structure
#[derive(Debug, Clone, Deserialize)]
struct TomlConfig {
    pub aggregator: AggregatorTomlConfig,
    pub logging: Option<LoggingTomlConfig>,
}

/// Runtime configuration (converted from TOML)
#[derive(Debug, Clone)]
struct CoinlabConfig {
    pub aggregator: AggregatorConfig,
    pub logging: LoggingConfig,
    pub log_cleanup_days: u32,
}

impl CoinlabConfig {
    /// Load configuration from a config.toml file
    fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_content = std::fs::read_to_string(path)?;
        let toml_config: TomlConfig = toml::from_str(&config_content)?;
        Self::from_toml_config(toml_config)
    }

    fn from_toml_config(
        toml_config: TomlConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let aggregator = AggregatorConfig {
            input_dir: PathBuf::from(toml_config.aggregator.input_dir),
            output_file: PathBuf::from(toml_config.aggregator.output_file),
            interval: Interval::parse(&toml_config.aggregator.interval)?,
            human_readable: toml_config.aggregator.human_readable.unwrap_or(false),
        };

        let (logging, log_cleanup_days) = if let Some(log_config) = toml_config.logging {
            let defaults = LoggingConfig::default();
            let config = LoggingConfig {
                log_dir: log_config.log_dir.unwrap_or(defaults.log_dir),
                level_filter: log_config.level_filter.unwrap_or(defaults.level_filter),
                rotation: log_config
                    .rotation
                    .map(|r| LogRotation::parse(&r))
                    .unwrap_or(defaults.rotation),
                console_timestamps: log_config.console_timestamps.unwrap_or(true),
                file_json_format: log_config.file_json_format.unwrap_or(true),
            };
            (config, log_config.cleanup_days.unwrap_or(30))
        } else {
            (LoggingConfig::default(), 30)
        };

        Ok(Self { aggregator, logging, log_cleanup_days })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = CoinlabConfig::from_toml(&config_path)?;

    let _guard = init_dual_logging(&config.logging)?;

    if let Err(e) = cleanup_old_logs(&config.logging.log_dir, config.log_cleanup_days) {
        error!("Log cleanup failed: {}", e);
    }

    let aggregator = &config.aggregator;
    info!(
        input_dir = %aggregator.input_dir.display(),
        output_file = %aggregator.output_file.display(),
        interval = ?aggregator.interval,
        human_readable = aggregator.human_readable,
        "🚀 Starting tick aggregation"
    );

    let start = Instant::now();

    let points = aggregate_directory(&aggregator.input_dir, aggregator.interval)?;
    write_series(
        &aggregator.output_file,
        &points,
        aggregator.interval,
        aggregator.human_readable,
    )?;

    info!(
        "✅ Wrote {} points to {} in {:?}",
        points.len(),
        aggregator.output_file.display(),
        start.elapsed()
    );

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("coinlab: {}", e);
        std::process::exit(1);
    }
}
