//! Block header.

use crate::{BlockHeight, TimestampNano};
use serde::{Deserialize, Serialize};

/// Block header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Virtual chain the block was produced on
    pub chain_id: u32,
    pub height: BlockHeight,
    /// Block closing time, nanoseconds since the Unix epoch
    pub timestamp: TimestampNano,
}

impl Header {
    /// Creates a new header
    pub fn new(chain_id: u32, height: BlockHeight, timestamp: TimestampNano) -> Self {
        Self {
            chain_id,
            height,
            timestamp,
        }
    }
}
