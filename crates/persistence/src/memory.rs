//! In-memory block store.

use crate::store::{check_append, BlockStore, BlockWriter};
use crate::Result;
use blockstats_ledger::{Block, BlockHeight};

/// Block store kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBlockStore {
    blocks: Vec<Block>,
    chain_id: Option<u32>,
}

impl MemoryBlockStore {
    /// Creates an empty store accepting blocks from any chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store accepting only blocks of `chain_id`
    pub fn with_chain_id(chain_id: u32) -> Self {
        Self {
            blocks: Vec::new(),
            chain_id: Some(chain_id),
        }
    }

    /// Builds a store from blocks that must start at height 1
    pub fn from_blocks<I>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Block>,
    {
        let mut store = Self::new();
        store.append_blocks(blocks)?;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockStore for MemoryBlockStore {
    fn last_height(&self) -> Result<BlockHeight> {
        Ok(self.blocks.len() as BlockHeight)
    }

    fn read_range(&self, from: BlockHeight, limit: usize) -> Result<Vec<Block>> {
        // heights are 1-based and dense, so height h lives at index h - 1
        let start = from.saturating_sub(1) as usize;
        if from == 0 || start >= self.blocks.len() {
            return Ok(Vec::new());
        }

        let end = start.saturating_add(limit).min(self.blocks.len());
        Ok(self.blocks[start..end].to_vec())
    }
}

impl BlockWriter for MemoryBlockStore {
    fn append_block(&mut self, block: Block) -> Result<()> {
        check_append(self.last_height()?, self.chain_id, &block)?;
        self.blocks.push(block);
        Ok(())
    }
}
