//! Observability module for monitoring and metrics.
//!
//! This module provides operation counters and timing helpers that log
//! through `tracing`.

pub mod metrics;

pub use metrics::{IndexMetrics, MetricsSummary, Timer};
