//! Key layout shared by the on-disk backends.
//!
//! Blocks live under a one-byte prefix followed by the big-endian height, so
//! a forward iteration from `block_key(h)` yields blocks in height order.

use crate::{Error, Result};
use blockstats_ledger::BlockHeight;

/// Prefix of every block key
pub const BLOCK_PREFIX: u8 = 0x01;

/// Key holding the tip height
pub const LAST_HEIGHT_KEY: &[u8] = b"SYS:LastHeight";

/// Key for the block at `height`
pub fn block_key(height: BlockHeight) -> [u8; 9] {
    let mut key = [0u8; 9];
    key[0] = BLOCK_PREFIX;
    key[1..].copy_from_slice(&height.to_be_bytes());
    key
}

/// Height encoded in a block key
pub fn height_from_key(key: &[u8]) -> Result<BlockHeight> {
    match key {
        [BLOCK_PREFIX, rest @ ..] if rest.len() == 8 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(rest);
            Ok(BlockHeight::from_be_bytes(bytes))
        }
        _ => Err(Error::Corrupted(format!("malformed block key {:?}", key))),
    }
}

pub fn encode_height(height: BlockHeight) -> [u8; 8] {
    height.to_be_bytes()
}

/// Decodes the value stored under [`LAST_HEIGHT_KEY`]
pub fn decode_height(value: &[u8]) -> Result<BlockHeight> {
    let bytes: [u8; 8] = value
        .try_into()
        .map_err(|_| Error::Corrupted(format!("tip height has {} bytes", value.len())))?;
    Ok(BlockHeight::from_be_bytes(bytes))
}
