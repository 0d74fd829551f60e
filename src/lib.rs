//! Contact index - a balanced, in-memory index of contact records.
//!
//! Records are kept in an AVL tree ordered by their exact (name, phone,
//! email) key. On top of the tree sit fuzzy duplicate detection, merging and
//! field validation, an application service and a JSON-lines command server.
//!
//! # Architecture
//!
//! - **models**: The record type and its exact key
//! - **index**: AVL tree with ordered snapshots and in-place edits
//! - **domain**: Validated value objects for names, phones and emails
//! - **validation**: Field predicates and invalid-record reports
//! - **matching**: Normalization and duplicate detection
//! - **merge**: Folding duplicate groups back into the index
//! - **services**: Application layer owning one index
//! - **server**: JSON-lines command protocol over stdio
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **observability**: Operation counters and timers

pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod matching;
pub mod merge;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, InvariantViolation, ServerError, ServiceError};
pub use index::ContactIndex;
pub use matching::{DuplicateDetector, FuzzyKey};
pub use merge::{MergeEngine, MergeReport, MergeStrategy};
pub use models::{Record, RecordKey};
pub use observability::{IndexMetrics, MetricsSummary};
pub use services::{ContactService, ContactServiceImpl, IndexStats};
pub use validation::InvalidRecord;
