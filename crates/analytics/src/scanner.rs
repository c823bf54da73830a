//! Scan driver.
//!
//! Walks a [`BlockStore`] page by page from the configured start height,
//! folds every page into a [`PageSummary`] and stops as soon as the
//! [`ContinuationPolicy`] says so. The last block of each page is carried
//! into the next page so closing times spanning a page boundary are counted.
//!
//! Any failure aborts the scan and discards the rows collected so far; the
//! error reports the last height that was fully processed so a later run can
//! resume from there.

use crate::aggregate::{aggregate_page, AggregateError, PageSummary};
use crate::policy::ContinuationPolicy;
use blockstats_config::{ScanConfig, DEFAULT_PAGE_SIZE, DEFAULT_START_HEIGHT};
use blockstats_ledger::{Block, BlockHeight, BlockMark};
use blockstats_persistence::BlockStore;
use thiserror::Error;
use tracing::{debug, error, info};

/// Scan failures
#[derive(Debug, Error)]
pub enum ScanError {
    /// The tip height could not be read; nothing was scanned
    #[error("block store unavailable: {source}")]
    StoreUnavailable {
        #[source]
        source: blockstats_persistence::Error,
    },

    /// The store failed while paging
    #[error("block scan failed: {source}")]
    ScanFailed {
        last_processed: Option<BlockHeight>,
        #[source]
        source: blockstats_persistence::Error,
    },

    /// The store delivered a page that breaks the paging contract
    #[error("malformed page starting at height {first_height}: {source}")]
    MalformedPage {
        first_height: BlockHeight,
        last_processed: Option<BlockHeight>,
        #[source]
        source: AggregateError,
    },

    #[error("invalid scan options: {0}")]
    InvalidOptions(String),
}

impl ScanError {
    /// Height of the last block folded into a row before the failure
    pub fn last_processed(&self) -> Option<BlockHeight> {
        match self {
            ScanError::ScanFailed { last_processed, .. }
            | ScanError::MalformedPage { last_processed, .. } => *last_processed,
            ScanError::StoreUnavailable { .. } | ScanError::InvalidOptions(_) => None,
        }
    }
}

/// Progress hooks; they observe the scan and cannot influence it
pub trait ScanObserver {
    /// Called once the tip is known, before the first page
    fn on_start(&mut self, _start_height: BlockHeight, _stopping_height: BlockHeight) {}

    /// Called after each page has been folded into `summary`
    fn on_page(&mut self, _summary: &PageSummary, _last_known_height: BlockHeight) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Scan parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub start_height: BlockHeight,
    /// Maximum number of blocks per page
    pub page_size: usize,
    pub policy: ContinuationPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            start_height: DEFAULT_START_HEIGHT,
            page_size: DEFAULT_PAGE_SIZE,
            policy: ContinuationPolicy::default(),
        }
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            start_height: config.start_height,
            page_size: config.page_size,
            policy: ContinuationPolicy::from_ceiling(config.ceiling),
        }
    }
}

/// Drives one scan over a block store
#[derive(Debug, Clone)]
pub struct BlockScanner {
    options: ScanOptions,
}

/// Everything the page callback mutates
struct ScanState<'a> {
    previous: Option<BlockMark>,
    rows: Vec<PageSummary>,
    failure: Option<ScanError>,
    stopping_height: BlockHeight,
    last_known_height: BlockHeight,
    policy: ContinuationPolicy,
    observer: &'a mut dyn ScanObserver,
}

impl ScanState<'_> {
    fn last_processed(&self) -> Option<BlockHeight> {
        self.previous.map(|mark| mark.height)
    }

    fn fail(&mut self, first_height: BlockHeight, source: AggregateError) -> bool {
        error!(
            target: "blockstats",
            first_height,
            error = %source,
            "rejecting malformed page"
        );
        self.failure = Some(ScanError::MalformedPage {
            first_height,
            last_processed: self.last_processed(),
            source,
        });
        false
    }

    /// Returns whether the scan wants another page
    fn on_page(&mut self, first_height: BlockHeight, page: &[Block]) -> bool {
        let Some(first) = page.first() else {
            return self.fail(first_height, AggregateError::EmptyPage);
        };

        if first.height() != first_height {
            return self.fail(
                first_height,
                AggregateError::HeightGap {
                    expected: first_height,
                    actual: first.height(),
                },
            );
        }

        // blocks past the stopping height belong to a later scan
        let within = page
            .iter()
            .position(|block| block.height() > self.stopping_height)
            .map_or(page, |cut| &page[..cut]);
        if within.is_empty() {
            return false;
        }

        let (summary, last) = match aggregate_page(self.previous, within) {
            Ok(result) => result,
            Err(source) => return self.fail(first_height, source),
        };

        self.previous = Some(last);
        info!(
            target: "blockstats",
            "processed {}/{}",
            last.height,
            self.last_known_height
        );
        debug!(
            target: "blockstats",
            height = summary.block_height,
            tx_count = summary.tx_count,
            closing_time_ms = summary.mean_closing_time_ms,
            "page aggregated"
        );
        self.observer.on_page(&summary, self.last_known_height);
        self.rows.push(summary);

        self.policy
            .should_continue(last.height, self.last_known_height)
    }
}

impl BlockScanner {
    /// Creates a scanner with the given options
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Runs the scan to completion, returning one row per processed page
    pub fn run<S>(&self, store: &S) -> Result<Vec<PageSummary>, ScanError>
    where
        S: BlockStore + ?Sized,
    {
        self.run_with_observer(store, &mut NoopObserver)
    }

    /// Runs the scan, reporting progress to `observer`
    pub fn run_with_observer<S>(
        &self,
        store: &S,
        observer: &mut dyn ScanObserver,
    ) -> Result<Vec<PageSummary>, ScanError>
    where
        S: BlockStore + ?Sized,
    {
        let ScanOptions {
            start_height,
            page_size,
            policy,
        } = self.options;

        if page_size == 0 {
            return Err(ScanError::InvalidOptions(
                "page size must be greater than zero".to_string(),
            ));
        }
        if start_height == 0 {
            return Err(ScanError::InvalidOptions(
                "start height must be at least 1".to_string(),
            ));
        }

        let last_known_height = store.last_height().map_err(|source| {
            error!(target: "blockstats", error = %source, "failed to read the tip height");
            ScanError::StoreUnavailable { source }
        })?;
        let stopping_height = policy.stopping_height(last_known_height);

        info!(
            target: "blockstats",
            start_height,
            stopping_height,
            last_known_height,
            page_size,
            "starting block scan"
        );
        observer.on_start(start_height, stopping_height);

        if start_height > stopping_height {
            return Ok(Vec::new());
        }

        let mut state = ScanState {
            previous: None,
            rows: Vec::new(),
            failure: None,
            stopping_height,
            last_known_height,
            policy,
            observer,
        };

        let result = store.scan_blocks(start_height, page_size, &mut |first, page| {
            state.on_page(first, page)
        });

        if let Err(source) = result {
            error!(target: "blockstats", error = %source, "block scan failed");
            return Err(ScanError::ScanFailed {
                last_processed: state.last_processed(),
                source,
            });
        }

        if let Some(failure) = state.failure {
            return Err(failure);
        }

        info!(
            target: "blockstats",
            rows = state.rows.len(),
            last_processed = state.last_processed().unwrap_or_default(),
            "block scan finished"
        );
        Ok(state.rows)
    }
}
