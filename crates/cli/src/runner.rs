//! One end-to-end report run: open the store, scan, render, write.

use crate::progress::ProgressObserver;
use anyhow::{Context, Result};
use blockstats_analytics::{render_report, BlockScanner, PageSummary, ScanError, ScanOptions};
use blockstats_config::{BlockStatsConfig, StorageConfig};
use blockstats_ledger::BlockHeight;
use blockstats_persistence::open_block_store;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task;
use tracing::{error, info};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of report rows written
    pub rows: usize,
    /// Height of the last block covered by the report
    pub last_height: Option<BlockHeight>,
    pub output: PathBuf,
}

/// Runs the scan on a blocking thread and writes the report.
///
/// The report file is only created once every row has been rendered; a
/// failed scan leaves no file behind.
pub async fn run(config: BlockStatsConfig) -> Result<RunOutcome> {
    let storage = config.storage.clone();
    let options = ScanOptions::from(&config.scan);
    let show_progress = config.logger.progress;

    let rows = task::spawn_blocking(move || scan_store(&storage, options, show_progress))
        .await
        .context("scan task terminated unexpectedly")??;

    let rendered = render_report(&rows, config.report.layout).map_err(|err| {
        error!(target: "blockstats", error = %err, "failed to process things");
        err
    })?;

    let output = config.report.output;
    if let Err(err) = tokio::fs::write(&output, rendered).await {
        error!(
            target: "blockstats",
            error = %err,
            path = %output.display(),
            "could not write file"
        );
        return Err(err).with_context(|| format!("could not write {}", output.display()));
    }

    info!(
        target: "blockstats",
        rows = rows.len(),
        path = %output.display(),
        "success"
    );

    Ok(RunOutcome {
        rows: rows.len(),
        last_height: rows.last().map(|row| row.block_height),
        output,
    })
}

/// Opens the configured store and scans it
fn scan_store(
    storage: &StorageConfig,
    options: ScanOptions,
    show_progress: bool,
) -> Result<Vec<PageSummary>> {
    let started = Instant::now();
    let store = open_block_store(storage);
    info!(
        target: "blockstats",
        duration = ?started.elapsed(),
        "startup time"
    );

    let store = store.map_err(|err| {
        error!(target: "blockstats", error = %err, "failed to start processing");
        err
    })?;

    let mut observer = if show_progress {
        ProgressObserver::new()
    } else {
        ProgressObserver::hidden()
    };
    let result = BlockScanner::new(options).run_with_observer(&store, &mut observer);
    observer.finish();

    result.map_err(|err| {
        match &err {
            ScanError::StoreUnavailable { .. } | ScanError::InvalidOptions(_) => {
                error!(target: "blockstats", error = %err, "failed to start processing");
            }
            ScanError::ScanFailed { .. } | ScanError::MalformedPage { .. } => {
                error!(
                    target: "blockstats",
                    error = %err,
                    last_processed = ?err.last_processed(),
                    "failed to process things"
                );
            }
        }
        err.into()
    })
}
