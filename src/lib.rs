//! # blockstats: block throughput and closing time reports
//!
//! Scans an append-only block store page by page and summarizes every page
//! into one CSV row: the timestamp and height of its last block, its
//! transaction count and the mean gap between consecutive blocks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockstats::prelude::*;
//!
//! fn main() -> blockstats::Result<()> {
//!     let store = MemoryBlockStore::new();
//!     let options = ScanOptions {
//!         page_size: 1000,
//!         policy: ContinuationPolicy::Ceiling(100_000),
//!         ..ScanOptions::default()
//!     };
//!
//!     let csv = blockstats::generate_report(&store, options, ReportLayout::Full)?;
//!     print!("{}", csv);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Configuration types and defaults
//! - [`ledger`] - Blocks, headers and transactions
//! - [`persistence`] - Block stores (memory, sled, RocksDB)
//! - [`analytics`] - Closing time estimation, page aggregation, scanning and rendering

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use blockstats_analytics as analytics;
pub use blockstats_config as config;
pub use blockstats_ledger as ledger;
pub use blockstats_persistence as persistence;

use analytics::{render_report, BlockScanner, ReportError, ScanError, ScanOptions};
use config::ReportLayout;
use persistence::BlockStore;
use thiserror::Error;

/// Common imports for blockstats users
pub mod prelude {
    pub use crate::analytics::{
        aggregate_page, render_report, write_report, BlockScanner, ClosingTimeEstimator,
        ContinuationPolicy, PageSummary, ScanError, ScanObserver, ScanOptions,
    };
    pub use crate::config::{BlockStatsConfig, ReportLayout, StorageBackend, StorageConfig};
    pub use crate::ledger::{Block, BlockBuilder, BlockHeight, Transaction};
    pub use crate::persistence::{open_block_store, BlockStore, BlockWriter, MemoryBlockStore};

    #[cfg(feature = "sled")]
    pub use crate::persistence::SledBlockStore;

    #[cfg(feature = "rocksdb")]
    pub use crate::persistence::RocksDbBlockStore;
}

/// Failure of a scan-and-render run
#[derive(Debug, Error)]
pub enum Error {
    /// The scan aborted; no rows are available
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A row could not be rendered
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Result type for blockstats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scans `store` and renders the report in one call.
///
/// Either the whole report is returned or nothing is.
pub fn generate_report<S>(store: &S, options: ScanOptions, layout: ReportLayout) -> Result<String>
where
    S: BlockStore + ?Sized,
{
    let rows = BlockScanner::new(options).run(store)?;
    Ok(render_report(&rows, layout)?)
}

/// blockstats library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
