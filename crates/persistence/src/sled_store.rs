//! Sled Block Store
//!
//! Each block is written in the same `sled::Batch` as the tip height, so the
//! tip never points past the last stored block.

use crate::keys::{self, block_key, LAST_HEIGHT_KEY};
use crate::store::{check_append, check_range, BlockStore, BlockWriter};
use crate::{Result, StorageConfig};
use blockstats_ledger::{Block, BlockHeight};
use tracing::{debug, info};

/// Sled-backed block store
pub struct SledBlockStore {
    db: sled::Db,
    chain_id: u32,
    max_block_size: u32,
}

impl SledBlockStore {
    /// Opens (or creates) the store at `config.path`
    pub fn open(config: &StorageConfig) -> Result<Self> {
        info!("Opening sled block store at: {:?}", config.path);

        let db = sled::Config::new().path(&config.path).open()?;

        Ok(Self {
            db,
            chain_id: config.chain_id,
            max_block_size: config.max_block_size_bytes,
        })
    }

    /// Flushes pending writes to disk
    pub fn flush(&self) -> Result<()> {
        let bytes = self.db.flush()?;
        debug!(bytes, "sled flush completed");
        Ok(())
    }
}

impl BlockStore for SledBlockStore {
    fn last_height(&self) -> Result<BlockHeight> {
        match self.db.get(LAST_HEIGHT_KEY)? {
            Some(value) => keys::decode_height(&value),
            None => Ok(0),
        }
    }

    fn read_range(&self, from: BlockHeight, limit: usize) -> Result<Vec<Block>> {
        if from == 0 || limit == 0 {
            return Ok(Vec::new());
        }

        let end = from.saturating_add(limit as u64 - 1);
        let mut blocks = Vec::with_capacity(limit.min(1024));
        for entry in self.db.range(block_key(from)..=block_key(end)) {
            let (key, value) = entry?;
            keys::height_from_key(&key)?;
            blocks.push(Block::decode(&value, self.max_block_size)?);
        }

        check_range(from, &blocks)?;
        Ok(blocks)
    }
}

impl BlockWriter for SledBlockStore {
    fn append_block(&mut self, block: Block) -> Result<()> {
        check_append(self.last_height()?, Some(self.chain_id), &block)?;

        let height = block.height();
        let mut batch = sled::Batch::default();
        batch.insert(&block_key(height)[..], block.encode()?);
        batch.insert(LAST_HEIGHT_KEY, &keys::encode_height(height)[..]);
        self.db.apply_batch(batch)?;

        debug!(height, "appended block");
        Ok(())
    }
}
