//! RocksDB Block Store
//!
//! Blocks are written together with the tip height in one `WriteBatch`, so a
//! reader never observes a tip pointing past the last stored block.

use crate::keys::{self, block_key, BLOCK_PREFIX, LAST_HEIGHT_KEY};
use crate::store::{check_append, check_range, BlockStore, BlockWriter};
use crate::{Result, StorageConfig};
use blockstats_ledger::{Block, BlockHeight};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::sync::Arc;
use tracing::{debug, info};

/// RocksDB-backed block store
pub struct RocksDbBlockStore {
    db: Arc<DB>,
    chain_id: u32,
    max_block_size: u32,
}

impl RocksDbBlockStore {
    /// Opens (or creates) the store at `config.path`
    pub fn open(config: &StorageConfig) -> Result<Self> {
        info!("Opening RocksDB block store at: {:?}", config.path);

        let mut db_options = Options::default();
        db_options.create_if_missing(true);
        db_options.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&db_options, &config.path)?;

        info!("RocksDB block store opened successfully at: {:?}", config.path);

        Ok(Self {
            db: Arc::new(db),
            chain_id: config.chain_id,
            max_block_size: config.max_block_size_bytes,
        })
    }

    /// Flushes memtables to disk
    pub fn flush(&self) -> Result<()> {
        debug!("Flushing block store writes to disk");
        self.db.flush()?;
        Ok(())
    }
}

impl BlockStore for RocksDbBlockStore {
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

        let start = block_key(from);
        let mut blocks = Vec::with_capacity(limit.min(1024));
        for entry in self
            .db
            .iterator(IteratorMode::From(&start, Direction::Forward))
        {
            let (key, value) = entry?;
            if key.first() != Some(&BLOCK_PREFIX) || blocks.len() == limit {
                break;
            }
            keys::height_from_key(&key)?;
            blocks.push(Block::decode(&value, self.max_block_size)?);
        }

        check_range(from, &blocks)?;
        Ok(blocks)
    }
}

impl BlockWriter for RocksDbBlockStore {
    fn append_block(&mut self, block: Block) -> Result<()> {
        check_append(self.last_height()?, Some(self.chain_id), &block)?;

        let height = block.height();
        let mut batch = WriteBatch::default();
        batch.put(block_key(height), block.encode()?);
        batch.put(LAST_HEIGHT_KEY, keys::encode_height(height));
        self.db.write(batch)?;

        debug!(height, "appended block");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockstats_ledger::BlockBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_range_stops_before_system_keys() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            path: dir.path().join("blocks"),
            ..StorageConfig::default()
        };
        let mut store = RocksDbBlockStore::open(&config).unwrap();

        for height in 1..=3 {
            let block = BlockBuilder::new(height).build().unwrap();
            store.append_block(block).unwrap();
        }

        assert_eq!(store.last_height().unwrap(), 3);
        assert_eq!(store.read_range(2, 100).unwrap().len(), 2);
        assert!(store.read_range(4, 100).unwrap().is_empty());
    }
}
