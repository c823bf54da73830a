//! Signed transaction payloads.

use serde::{Deserialize, Serialize};

/// A signed transaction as stored inside a block.
///
/// The scanner never looks inside a transaction; only the number of
/// transactions per block contributes to the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub payload: Vec<u8>,
}

impl Transaction {
    /// Creates a new transaction
    pub fn new(nonce: u64, payload: Vec<u8>) -> Self {
        Self { nonce, payload }
    }
}
