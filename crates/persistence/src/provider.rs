//! Backend selection.

use crate::{BlockStore, MemoryBlockStore, Result, StorageBackend, StorageConfig};
use tracing::info;

/// Opens the block store described by `config`
pub fn open_block_store(config: &StorageConfig) -> Result<Box<dyn BlockStore + Send>> {
    info!(
        target: "blockstats",
        backend = %config.backend,
        chain_id = config.chain_id,
        network = %config.network_type,
        "opening block store"
    );

    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryBlockStore::with_chain_id(config.chain_id))),
        StorageBackend::Sled => open_sled(config),
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "sled")]
fn open_sled(config: &StorageConfig) -> Result<Box<dyn BlockStore + Send>> {
    Ok(Box::new(crate::SledBlockStore::open(config)?))
}

#[cfg(not(feature = "sled"))]
fn open_sled(config: &StorageConfig) -> Result<Box<dyn BlockStore + Send>> {
    Err(crate::Error::UnsupportedBackend(config.backend.to_string()))
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &StorageConfig) -> Result<Box<dyn BlockStore + Send>> {
    Ok(Box::new(crate::RocksDbBlockStore::open(config)?))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(config: &StorageConfig) -> Result<Box<dyn BlockStore + Send>> {
    Err(crate::Error::UnsupportedBackend(config.backend.to_string()))
}
