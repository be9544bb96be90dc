//! pcmd - reorder command lists by how often you use them
//!
//! This library provides the frequency store, the weighted sort that reads
//! from it, and the command layer used by the `pcmd` binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod usage;

pub use error::{PcmdError, Result};
