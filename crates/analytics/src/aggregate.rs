//! Folding one page of blocks into one report row.

use crate::closing_time::{ClosingTimeEstimator, EstimatorError};
use blockstats_ledger::{Block, BlockHeight, BlockMark, TimestampNano};
use thiserror::Error;
use tracing::warn;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// One report row, summarizing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Timestamp of the last block in the page
    pub timestamp: TimestampNano,
    /// Height of the last block in the page
    pub block_height: BlockHeight,
    /// Transactions across the whole page
    pub tx_count: u64,
    /// Mean gap between consecutive block timestamps, truncated to whole ms.
    ///
    /// The report column is called `medianBlockClosingTime` for compatibility
    /// with existing consumers, but the value is a mean.
    pub mean_closing_time_ms: u64,
    /// Gaps that fell outside 0 ms ..= 24 h and were clamped before averaging
    pub clamped_gaps: u64,
}

/// Page aggregation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("page contains no blocks")]
    EmptyPage,

    #[error("height gap: expected block {expected}, got {actual}")]
    HeightGap {
        expected: BlockHeight,
        actual: BlockHeight,
    },

    #[error(transparent)]
    Estimator(#[from] EstimatorError),
}

/// Folds `page` into a [`PageSummary`].
///
/// `previous` is the last block of the preceding page, if any; its gap to the
/// first block of `page` counts toward this page's closing time. Returns the
/// summary together with the mark of the page's last block, which becomes
/// `previous` for the next page.
pub fn aggregate_page(
    previous: Option<BlockMark>,
    page: &[Block],
) -> Result<(PageSummary, BlockMark), AggregateError> {
    let last = page.last().ok_or(AggregateError::EmptyPage)?;

    let mut estimator = ClosingTimeEstimator::new()?;
    let mut tx_count = 0u64;
    let mut current = previous;

    for block in page {
        if let Some(prev) = current {
            let expected = prev.height + 1;
            if block.height() != expected {
                return Err(AggregateError::HeightGap {
                    expected,
                    actual: block.height(),
                });
            }
            estimator.record(closing_time_ms(prev.timestamp, block.timestamp()));
        }

        tx_count += block.transaction_count() as u64;
        current = Some(block.mark());
    }

    let clamped_gaps = estimator.clamped();
    if clamped_gaps > 0 {
        warn!(
            target: "blockstats",
            height = last.height(),
            clamped = clamped_gaps,
            "block closing times out of range were clamped"
        );
    }

    let summary = PageSummary {
        timestamp: last.timestamp(),
        block_height: last.height(),
        tx_count,
        mean_closing_time_ms: estimator.estimate() as u64,
        clamped_gaps,
    };

    Ok((summary, last.mark()))
}

/// Signed gap between two timestamps in whole milliseconds, truncated toward zero
fn closing_time_ms(previous: TimestampNano, current: TimestampNano) -> i64 {
    let delta = (i128::from(current) - i128::from(previous)) / NANOS_PER_MILLI;
    // |u64::MAX / 10^6| fits comfortably in i64
    delta as i64
}
