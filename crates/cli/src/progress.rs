//! Terminal progress bar for a running scan.

use blockstats_analytics::{PageSummary, ScanObserver};
use blockstats_ledger::BlockHeight;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} blocks ({eta})";

/// Draws scan progress, measured in blocks
pub struct ProgressObserver {
    bar: ProgressBar,
    start_height: BlockHeight,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Observer that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);

        Self {
            bar,
            start_height: 0,
        }
    }

    /// Blocks processed so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Removes the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanObserver for ProgressObserver {
    fn on_start(&mut self, start_height: BlockHeight, stopping_height: BlockHeight) {
        self.start_height = start_height;
        let total = stopping_height.saturating_add(1).saturating_sub(start_height);
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn on_page(&mut self, summary: &PageSummary, _last_known_height: BlockHeight) {
        let done = summary
            .block_height
            .saturating_add(1)
            .saturating_sub(self.start_height);
        self.bar.set_position(done);
    }
}
