//! # Blockstats Persistence Layer
//!
//! Append-only block stores indexed by height.
//!
//! ## Architecture
//!
//! - **BlockStore**: Read side; the tip height and height-ordered range reads,
//!   with the paging loop provided on top of them
//! - **BlockWriter**: Append side; enforces contiguous heights and the chain id
//! - **open_block_store**: Backend selection from a [`StorageConfig`]
//!
//! ## Storage Backends
//!
//! - **Memory**: a plain vector, for tests and dry runs
//! - **Sled** (default feature `sled`): embedded pure-Rust store
//! - **RocksDB** (feature `rocksdb`): LSM store for large archives
//!
//! Both on-disk backends share the key layout in [`keys`] and store blocks
//! with the ledger codec.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod keys;
pub mod memory;
pub mod provider;
/// Core block store traits
pub mod store;

/// RocksDB block store implementation
#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;
/// Sled block store implementation
#[cfg(feature = "sled")]
pub mod sled_store;

pub use memory::MemoryBlockStore;
pub use provider::open_block_store;
pub use store::{BlockStore, BlockWriter};

#[cfg(feature = "rocksdb")]
pub use rocksdb_store::RocksDbBlockStore;
#[cfg(feature = "sled")]
pub use sled_store::SledBlockStore;

pub use blockstats_config::{StorageBackend, StorageConfig};

use blockstats_ledger::BlockHeight;
use thiserror::Error;

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, Error>;

/// Persistence errors
#[derive(Debug, Error)]
pub enum Error {
    /// Storage engine failure
    #[error("Database error: {0}")]
    Database(String),

    /// A stored block could not be decoded or a block could not be encoded
    #[error("Codec error: {0}")]
    Codec(#[from] blockstats_ledger::Error),

    /// Appending out of order
    #[error("Non-contiguous block: expected height {expected}, got {actual}")]
    NonContiguous {
        expected: BlockHeight,
        actual: BlockHeight,
    },

    /// Appending a block from another chain
    #[error("Chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u32, actual: u32 },

    /// Invalid arguments to a store operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend not compiled into this build
    #[error("Unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    /// Index and data disagree
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}

#[cfg(feature = "sled")]
impl From<::sled::Error> for Error {
    fn from(error: ::sled::Error) -> Self {
        Error::Database(format!("sled: {}", error))
    }
}

#[cfg(feature = "rocksdb")]
impl From<::rocksdb::Error> for Error {
    fn from(error: ::rocksdb::Error) -> Self {
        Error::Database(format!("RocksDB: {}", error))
    }
}
