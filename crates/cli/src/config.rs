//! Configuration loading for the blockstats binary.
//!
//! The TOML file is optional; every section falls back to its defaults and
//! command-line flags are applied on top.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use blockstats_config::BlockStatsConfig;
use std::path::Path;

/// Reads and parses a TOML configuration file
pub async fn load_file(path: &Path) -> Result<BlockStatsConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid configuration file {}", path.display()))
}

/// Parses TOML configuration text
pub fn parse(content: &str) -> Result<BlockStatsConfig> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration named by `args`, applies the overrides and
/// validates the result
pub async fn load(args: &CliArgs) -> Result<BlockStatsConfig> {
    let mut config = match &args.config {
        Some(path) => load_file(path).await?,
        None => BlockStatsConfig::default(),
    };

    apply_args(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Overrides configuration values with the flags that were given
pub fn apply_args(config: &mut BlockStatsConfig, args: &CliArgs) {
    if let Some(path) = &args.storage {
        config.storage.path = path.clone();
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    if let Some(chain_id) = args.chain_id {
        config.storage.chain_id = chain_id;
    }

    if let Some(start_height) = args.start_height {
        config.scan.start_height = start_height;
    }
    if let Some(page_size) = args.page_size {
        config.scan.page_size = page_size;
    }
    if args.ceiling.is_some() {
        config.scan.ceiling = args.ceiling;
    }

    if let Some(output) = &args.output {
        config.report.output = output.clone();
    }
    if let Some(layout) = args.layout {
        config.report.layout = layout;
    }

    if let Some(level) = &args.log_level {
        config.logger.level = level.clone();
    }
    if let Some(format) = args.log_format {
        config.logger.format = format;
    }
    if args.no_progress {
        config.logger.progress = false;
    }
}
