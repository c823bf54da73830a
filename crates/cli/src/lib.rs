//! blockstats command-line interface
//!
//! Loads the configuration, scans the configured block store and writes the
//! CSV report. The binary in `main.rs` is a thin wrapper around [`runner::run`].

pub mod args;
pub mod config;
pub mod logging;
pub mod progress;
pub mod runner;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
