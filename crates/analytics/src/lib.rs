//! # Blockstats Analytics
//!
//! Paginated scan-and-aggregate pipeline over a block store.
//!
//! A [`BlockScanner`] pages through the store, [`aggregate_page`] folds each
//! page into one [`PageSummary`] (last timestamp and height, transaction
//! total and mean block closing time) and [`render_report`] turns the rows
//! into a CSV report.
//!
//! ```no_run
//! use blockstats_analytics::{render_report, BlockScanner, ScanOptions};
//! use blockstats_config::ReportLayout;
//! use blockstats_persistence::MemoryBlockStore;
//!
//! let store = MemoryBlockStore::new();
//! let rows = BlockScanner::new(ScanOptions::default()).run(&store).unwrap();
//! let csv = render_report(&rows, ReportLayout::Full).unwrap();
//! # let _ = csv;
//! ```

pub mod aggregate;
pub mod closing_time;
pub mod policy;
pub mod report;
pub mod scanner;

pub use aggregate::{aggregate_page, AggregateError, PageSummary};
pub use closing_time::{ClosingTimeEstimator, EstimatorError};
pub use policy::ContinuationPolicy;
pub use report::{
    format_timestamp, render_report, write_report, ReportError, COMPACT_HEADER, FULL_HEADER,
};
pub use scanner::{BlockScanner, NoopObserver, ScanError, ScanObserver, ScanOptions};
