//! Block builder for constructing blocks.

use super::{header::Header, Block};
use crate::{BlockHeight, Error, Result, TimestampNano, Transaction};
use blockstats_config::DEFAULT_CHAIN_ID;

/// Block builder for constructing new blocks
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    chain_id: u32,
    height: BlockHeight,
    timestamp: TimestampNano,
    transactions: Vec<Transaction>,
}

impl BlockBuilder {
    /// Creates a new block builder for the given height
    pub fn new(height: BlockHeight) -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            height,
            timestamp: 0,
            transactions: Vec::new(),
        }
    }

    /// Sets the chain id
    pub fn chain_id(mut self, chain_id: u32) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the block timestamp (nanoseconds)
    pub fn timestamp(mut self, timestamp: TimestampNano) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Adds a transaction to the block
    pub fn transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Sets all transactions
    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Adds `count` transactions with empty payloads
    pub fn empty_transactions(mut self, count: usize) -> Self {
        let first_nonce = self.transactions.len() as u64;
        self.transactions
            .extend((0..count as u64).map(|i| Transaction::new(first_nonce + i, Vec::new())));
        self
    }

    /// Builds the block
    pub fn build(self) -> Result<Block> {
        if self.height == 0 {
            return Err(Error::InvalidHeight(self.height));
        }

        Ok(Block::new(
            Header::new(self.chain_id, self.height, self.timestamp),
            self.transactions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let block = BlockBuilder::new(1).build().unwrap();
        assert_eq!(block.chain_id(), DEFAULT_CHAIN_ID);
        assert_eq!(block.timestamp(), 0);
        assert_eq!(block.transaction_count(), 0);
    }

    #[test]
    fn test_builder_rejects_height_zero() {
        assert!(matches!(
            BlockBuilder::new(0).build(),
            Err(Error::InvalidHeight(0))
        ));
    }

    #[test]
    fn test_empty_transactions_keep_unique_nonces() {
        let block = BlockBuilder::new(5)
            .transaction(Transaction::new(0, vec![1]))
            .empty_transactions(3)
            .build()
            .unwrap();

        let nonces: Vec<u64> = block.transactions.iter().map(|tx| tx.nonce).collect();
        assert_eq!(nonces, vec![0, 1, 2, 3]);
    }
}
