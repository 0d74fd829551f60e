//! Fuzzy identity for contact records.
//!
//! This module provides field normalization and the duplicate detector built
//! on it. Fuzzy identity is only ever used to find near-duplicates; the index
//! itself orders and deduplicates by exact key.

pub mod duplicates;
pub mod normalizer;

pub use duplicates::{DuplicateDetector, MatchType, DEFAULT_NAME_SLACK};
pub use normalizer::{
    is_fuzzy_duplicate, normalize_email, normalize_name, normalize_phone, FuzzyKey,
};
