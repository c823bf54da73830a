//! Blockstats Configuration Module
//!
//! This module provides the configuration types shared by the block store
//! backends, the scan-and-aggregate pipeline and the `blockstats` binary.
//!
//! Every section deserializes with `#[serde(default)]`, so a configuration
//! file only needs to mention the values it overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Height the scan starts from when nothing else is configured
pub const DEFAULT_START_HEIGHT: u64 = 1;

/// Number of blocks requested from the store per page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Virtual chain the blocks are expected to belong to
pub const DEFAULT_CHAIN_ID: u32 = 1_100_000;

/// Largest encoded block accepted by the store codecs (64 MiB)
pub const MAX_BLOCK_SIZE_IN_BYTES: u32 = 64 * 1024 * 1024;

/// Upper bound of the closing time histogram (24 hours)
pub const MAX_CLOSING_TIME_MS: u64 = 24 * 60 * 60 * 1000;

/// Precision of the closing time histogram
pub const CLOSING_TIME_SIGNIFICANT_FIGURES: u8 = 1;

/// Report file written when no output path is configured
pub const DEFAULT_OUTPUT_PATH: &str = "out.csv";

/// Directory holding the on-disk block store by default
pub const DEFAULT_STORAGE_PATH: &str = "./data/blocks";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The page size must allow at least one block per fetch
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// Heights start at 1
    #[error("start height must be at least 1")]
    ZeroStartHeight,

    /// The ceiling would stop the scan before it starts
    #[error("ceiling {ceiling} is below the start height {start}")]
    CeilingBelowStart { ceiling: u64, start: u64 },

    /// On-disk backends need somewhere to live
    #[error("storage backend '{0}' requires a data path")]
    MissingStoragePath(StorageBackend),

    /// Maximum block size must be positive
    #[error("maximum block size must be greater than zero")]
    ZeroMaxBlockSize,
}

/// Result type for configuration validation
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Network type the chain belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    MainNet,
    TestNet,
    /// Reserved network type used by local and archived chains
    #[default]
    Private,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
            NetworkType::Private => write!(f, "private"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::MainNet),
            "testnet" | "test" => Ok(NetworkType::TestNet),
            "private" | "privnet" | "reserved" => Ok(NetworkType::Private),
            _ => Err(format!("Unknown network type: {}", s)),
        }
    }
}

/// Block store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Volatile store, only useful for tests and dry runs
    Memory,
    #[default]
    Sled,
    RocksDb,
}

impl StorageBackend {
    /// Whether the backend persists to `StorageConfig::path`
    pub fn is_persistent(&self) -> bool {
        !matches!(self, StorageBackend::Memory)
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Sled => write!(f, "sled"),
            StorageBackend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "inmemory" => Ok(StorageBackend::Memory),
            "sled" => Ok(StorageBackend::Sled),
            "rocksdb" | "rocksdb-store" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unsupported storage backend '{}'", other)),
        }
    }
}

/// Shape of the emitted report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    /// `timestamp,blockHeight,txCount,medianBlockClosingTime`
    #[default]
    Full,
    /// `blockHeight,txCount`
    Compact,
}

impl FromStr for ReportLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ReportLayout::Full),
            "compact" | "short" => Ok(ReportLayout::Compact),
            _ => Err(format!("Unknown report layout: {}", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    /// Blocks from any other chain are rejected on import
    pub chain_id: u32,
    pub network_type: NetworkType,
    pub max_block_size_bytes: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
            chain_id: DEFAULT_CHAIN_ID,
            network_type: NetworkType::default(),
            max_block_size_bytes: MAX_BLOCK_SIZE_IN_BYTES,
        }
    }
}

impl StorageConfig {
    /// In-memory storage, nothing touches the disk
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::new(),
            ..Self::default()
        }
    }
}

/// Scan configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub start_height: u64,
    pub page_size: usize,
    /// Stop at this height even if the store holds more blocks
    pub ceiling: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_height: DEFAULT_START_HEIGHT,
            page_size: DEFAULT_PAGE_SIZE,
            ceiling: None,
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output: PathBuf,
    pub layout: ReportLayout,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            layout: ReportLayout::default(),
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
    /// Draw a progress bar while scanning
    pub progress: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            progress: true,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStatsConfig {
    pub storage: StorageConfig,
    pub scan: ScanConfig,
    pub report: ReportConfig,
    pub logger: LoggerConfig,
}

impl BlockStatsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.scan.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        if self.scan.start_height == 0 {
            return Err(ConfigError::ZeroStartHeight);
        }

        if let Some(ceiling) = self.scan.ceiling {
            if ceiling < self.scan.start_height {
                return Err(ConfigError::CeilingBelowStart {
                    ceiling,
                    start: self.scan.start_height,
                });
            }
        }

        if self.storage.backend.is_persistent() && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingStoragePath(self.storage.backend));
        }

        if self.storage.max_block_size_bytes == 0 {
            return Err(ConfigError::ZeroMaxBlockSize);
        }

        Ok(())
    }
}
