//! Block store interfaces.

use crate::{Error, Result};
use blockstats_ledger::{Block, BlockHeight};

/// Read access to an append-only, height-indexed block store.
///
/// Heights start at 1 and have no gaps, so the tip height is also the
/// number of stored blocks.
pub trait BlockStore {
    /// Height of the newest block, 0 when the store is empty
    fn last_height(&self) -> Result<BlockHeight>;

    /// Up to `limit` consecutive blocks starting at `from`.
    ///
    /// Returns an empty vector when `from` is past the tip.
    fn read_range(&self, from: BlockHeight, limit: usize) -> Result<Vec<Block>>;

    /// Walks the store page by page starting at `start`.
    ///
    /// `on_page` receives the height of the first block in the page and the
    /// page itself, at most `page_size` blocks, in increasing height order.
    /// The walk ends when `on_page` returns `false`, when the store runs out
    /// of blocks, or on the first read error.
    fn scan_blocks(
        &self,
        start: BlockHeight,
        page_size: usize,
        on_page: &mut dyn FnMut(BlockHeight, &[Block]) -> bool,
    ) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidArgument(
                "page size must be greater than zero".to_string(),
            ));
        }

        let mut from = start;
        loop {
            let page = self.read_range(from, page_size)?;
            let Some(last) = page.last() else {
                return Ok(());
            };

            let next = last.height() + 1;
            if !on_page(from, &page) {
                return Ok(());
            }
            from = next;
        }
    }
}

impl<S: BlockStore + ?Sized> BlockStore for Box<S> {
    fn last_height(&self) -> Result<BlockHeight> {
        (**self).last_height()
    }

    fn read_range(&self, from: BlockHeight, limit: usize) -> Result<Vec<Block>> {
        (**self).read_range(from, limit)
    }

    fn scan_blocks(
        &self,
        start: BlockHeight,
        page_size: usize,
        on_page: &mut dyn FnMut(BlockHeight, &[Block]) -> bool,
    ) -> Result<()> {
        (**self).scan_blocks(start, page_size, on_page)
    }
}

/// Append access to a block store
pub trait BlockWriter: BlockStore {
    /// Appends the block following the current tip
    fn append_block(&mut self, block: Block) -> Result<()>;

    /// Appends blocks in order, stopping at the first failure
    fn append_blocks<I>(&mut self, blocks: I) -> Result<()>
    where
        I: IntoIterator<Item = Block>,
        Self: Sized,
    {
        for block in blocks {
            self.append_block(block)?;
        }
        Ok(())
    }
}

/// Checks that `block` may follow a tip at `last_height`
pub(crate) fn check_append(
    last_height: BlockHeight,
    chain_id: Option<u32>,
    block: &Block,
) -> Result<()> {
    let expected = last_height + 1;
    if block.height() != expected {
        return Err(Error::NonContiguous {
            expected,
            actual: block.height(),
        });
    }

    if let Some(expected) = chain_id {
        if block.chain_id() != expected {
            return Err(Error::ChainMismatch {
                expected,
                actual: block.chain_id(),
            });
        }
    }

    Ok(())
}

/// Checks that a range read came back gap-free starting at `from`
pub(crate) fn check_range(from: BlockHeight, blocks: &[Block]) -> Result<()> {
    for (offset, block) in blocks.iter().enumerate() {
        let expected = from + offset as u64;
        if block.height() != expected {
            return Err(Error::Corrupted(format!(
                "block stored under height {} reports height {}",
                expected,
                block.height()
            )));
        }
    }
    Ok(())
}
