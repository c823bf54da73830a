//! Full block structure and its binary codec.

use super::header::Header;
use crate::{BlockHeight, Error, Result, TimestampNano, Transaction};
use bincode::Options;
use serde::{Deserialize, Serialize};

/// A block: header plus the signed transactions it closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

/// Height and timestamp of a block.
///
/// This is all the closing time computation needs from the block preceding a
/// page, so it is what gets carried from one page to the next instead of the
/// whole block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMark {
    pub height: BlockHeight,
    pub timestamp: TimestampNano,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

impl Block {
    /// Creates a new block
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    pub fn height(&self) -> BlockHeight {
        self.header.height
    }

    pub fn timestamp(&self) -> TimestampNano {
        self.header.timestamp
    }

    pub fn chain_id(&self) -> u32 {
        self.header.chain_id
    }

    /// Number of signed transactions in the block
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn mark(&self) -> BlockMark {
        BlockMark {
            height: self.height(),
            timestamp: self.timestamp(),
        }
    }

    /// Serializes the block for storage
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(codec().serialize(self)?)
    }

    /// Deserializes a stored block, refusing anything larger than `max_block_size` bytes
    pub fn decode(bytes: &[u8], max_block_size: u32) -> Result<Self> {
        if bytes.len() > max_block_size as usize {
            return Err(Error::BlockTooLarge {
                size: bytes.len(),
                max: max_block_size,
            });
        }

        Ok(codec()
            .with_limit(u64::from(max_block_size))
            .deserialize(bytes)?)
    }
}
