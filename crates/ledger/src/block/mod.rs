//! Block data structures.
//!
//! The implementation is split into modules:
//! - header: Block header (chain id, height, timestamp)
//! - block: Full block with its transactions and the binary codec
//! - builder: Block builder for creating blocks

#[allow(clippy::module_inception)]
pub mod block;
pub mod builder;
pub mod header;

// Re-export main types for convenience
pub use block::{Block, BlockMark};
pub use builder::BlockBuilder;
pub use header::Header;
