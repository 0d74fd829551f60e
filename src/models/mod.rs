//! Data models for contact records.
//!
//! This module contains the record type stored by the index and its exact
//! key.

pub mod record;

pub use record::{Record, RecordKey};
