//! Deciding when a scan stops.

use blockstats_ledger::BlockHeight;

/// Rule deciding whether the scan fetches another page.
///
/// The tip height is read once before the scan starts; blocks appended while
/// the scan runs are never included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationPolicy {
    /// Scan up to the tip observed at start
    #[default]
    ToTip,
    /// Scan up to the given height, or the tip if that comes first
    Ceiling(BlockHeight),
}

impl ContinuationPolicy {
    /// `Ceiling` when a ceiling is configured, `ToTip` otherwise
    pub fn from_ceiling(ceiling: Option<BlockHeight>) -> Self {
        ceiling.map_or(ContinuationPolicy::ToTip, ContinuationPolicy::Ceiling)
    }

    /// Last height the scan may process
    pub fn stopping_height(&self, last_known_height: BlockHeight) -> BlockHeight {
        match *self {
            ContinuationPolicy::ToTip => last_known_height,
            ContinuationPolicy::Ceiling(ceiling) => ceiling.min(last_known_height),
        }
    }

    /// Whether another page is wanted after a page ending at `last_batch_height`
    pub fn should_continue(
        &self,
        last_batch_height: BlockHeight,
        last_known_height: BlockHeight,
    ) -> bool {
        last_batch_height < self.stopping_height(last_known_height)
    }
}
