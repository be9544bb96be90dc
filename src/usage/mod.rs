//! # Usage Tracking Module
//!
//! Frequency counters for commands and the sort that consumes them.
//!
//! ## Overview
//!
//! [`FrequencyStore`] owns the `command -> weight` map and its backing file.
//! [`sort_by_weight`] reorders lines using any [`WeightSource`], putting the
//! most used commands first.
//!
//! ## Storage
//!
//! The store defaults to `$HOME/.pcmd.txt`:
//!
//! ```text
//! git:42
//! cargo test:7
//! ```

mod sorter;
mod storage;

pub use sorter::sort_by_weight;
pub(crate) use storage::decode_line;
pub use storage::{FrequencyStore, LoadReport, WeightSource};
