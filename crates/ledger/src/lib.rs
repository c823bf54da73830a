//! Blockstats Ledger Module
//!
//! This module provides the chain data model read by the blockstats scanner.
//!
//! ## Components
//!
//! - **Block**: Header plus the list of signed transactions
//! - **Header**: Chain id, height and nanosecond timestamp
//! - **BlockMark**: The height/timestamp pair carried between pages
//! - **BlockBuilder**: Fluent construction of blocks for imports and fixtures
//!
//! Blocks are persisted with a size-limited bincode codec; see [`Block::encode`]
//! and [`Block::decode`].

pub mod block;
pub mod transaction;

pub use block::{Block, BlockBuilder, BlockMark, Header};
pub use transaction::Transaction;

/// Height of a block; the first block of a chain has height 1
pub type BlockHeight = u64;

/// Nanoseconds since the Unix epoch
pub type TimestampNano = u64;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger-specific error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization error
    #[error("Block encoding error: {0}")]
    Encoding(String),

    /// Encoded block exceeds the configured limit
    #[error("Block of {size} bytes exceeds the maximum of {max} bytes")]
    BlockTooLarge { size: usize, max: u32 },

    /// Invalid block height
    #[error("Invalid block height: {0}")]
    InvalidHeight(BlockHeight),
}

impl From<bincode::Error> for Error {
    fn from(error: bincode::Error) -> Self {
        Error::Encoding(error.to_string())
    }
}
