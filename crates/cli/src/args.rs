use blockstats_config::{LogFormat, ReportLayout, StorageBackend};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for blockstats.
///
/// Every flag overrides the matching value of the configuration file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "blockstats",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scans a block store and reports per-page throughput and block closing times",
    long_about = "blockstats walks a block store page by page from a start height, summarizes every page (last timestamp and height, transaction count, mean block closing time) and writes the result as a CSV report."
)]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "BLOCKSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the block store path
    #[arg(long = "storage", value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// Overrides the storage backend (memory, sled, rocksdb)
    #[arg(long = "backend", value_name = "BACKEND")]
    pub backend: Option<StorageBackend>,

    /// Overrides the virtual chain id
    #[arg(long = "chain-id", value_name = "ID")]
    pub chain_id: Option<u32>,

    /// First block height to scan
    #[arg(long = "start-height", value_name = "HEIGHT")]
    pub start_height: Option<u64>,

    /// Number of blocks fetched per page; one report row per page
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Stop at this height even if the store holds more blocks
    #[arg(long = "ceiling", value_name = "HEIGHT")]
    pub ceiling: Option<u64>,

    /// Report file to write
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report layout (full, compact)
    #[arg(long = "layout", value_name = "LAYOUT")]
    pub layout: Option<ReportLayout>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log output format (pretty, json)
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Do not draw a progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}
