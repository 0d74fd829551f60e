//! Duplicate merging.
//!
//! Groups produced by the duplicate detector are folded into single records
//! and written back to the index through its public insert/delete
//! operations.

pub mod engine;

pub use engine::{coalesce, merge_group, MergeEngine, MergeReport, MergeStrategy};
