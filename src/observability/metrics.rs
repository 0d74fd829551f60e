//! Operation counters for the contact service.
//!
//! Counters are cheap to clone (they share their atomics) so the service and
//! the command server can hold the same tracker.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counts what happened to the index over its lifetime.
#[derive(Debug, Clone)]
pub struct IndexMetrics {
    inserts_total: Arc<AtomicU64>,
    duplicate_inserts_total: Arc<AtomicU64>,
    updates_total: Arc<AtomicU64>,
    deletes_total: Arc<AtomicU64>,
    records_merged_total: Arc<AtomicU64>,
    merge_collisions_total: Arc<AtomicU64>,
    validation_failures_total: Arc<AtomicU64>,
}

impl IndexMetrics {
    /// Create a tracker with every counter at zero.
    pub fn new() -> Self {
        Self {
            inserts_total: Arc::new(AtomicU64::new(0)),
            duplicate_inserts_total: Arc::new(AtomicU64::new(0)),
            updates_total: Arc::new(AtomicU64::new(0)),
            deletes_total: Arc::new(AtomicU64::new(0)),
            records_merged_total: Arc::new(AtomicU64::new(0)),
            merge_collisions_total: Arc::new(AtomicU64::new(0)),
            validation_failures_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track an insert attempt.
    pub fn track_insert(&self, inserted: bool) {
        if inserted {
            self.inserts_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.duplicate_inserts_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Track a successful update.
    pub fn track_update(&self) {
        self.updates_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Track a delete that removed a record.
    pub fn track_delete(&self) {
        self.deletes_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Track the outcome of a merge pass.
    pub fn track_merge(&self, merged: usize, skipped: usize) {
        self.records_merged_total
            .fetch_add(merged as u64, Ordering::Relaxed);
        self.merge_collisions_total
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    /// Track a record rejected by validation.
    pub fn track_validation_failure(&self) {
        self.validation_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inserts_total(&self) -> u64 {
        self.inserts_total.load(Ordering::Relaxed)
    }

    pub fn duplicate_inserts_total(&self) -> u64 {
        self.duplicate_inserts_total.load(Ordering::Relaxed)
    }

    pub fn updates_total(&self) -> u64 {
        self.updates_total.load(Ordering::Relaxed)
    }

    pub fn deletes_total(&self) -> u64 {
        self.deletes_total.load(Ordering::Relaxed)
    }

    pub fn records_merged_total(&self) -> u64 {
        self.records_merged_total.load(Ordering::Relaxed)
    }

    pub fn merge_collisions_total(&self) -> u64 {
        self.merge_collisions_total.load(Ordering::Relaxed)
    }

    pub fn validation_failures_total(&self) -> u64 {
        self.validation_failures_total.load(Ordering::Relaxed)
    }

    /// A point-in-time copy of every counter.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            inserts_total: self.inserts_total(),
            duplicate_inserts_total: self.duplicate_inserts_total(),
            updates_total: self.updates_total(),
            deletes_total: self.deletes_total(),
            records_merged_total: self.records_merged_total(),
            merge_collisions_total: self.merge_collisions_total(),
            validation_failures_total: self.validation_failures_total(),
        }
    }
}

impl Default for IndexMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSummary {
    pub inserts_total: u64,
    pub duplicate_inserts_total: u64,
    pub updates_total: u64,
    pub deletes_total: u64,
    pub records_merged_total: u64,
    pub merge_collisions_total: u64,
    pub validation_failures_total: u64,
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer for the given operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Finish the timer and return the elapsed time in microseconds.
    pub fn finish(self) -> u128 {
        let duration_us = self.start.elapsed().as_micros();

        tracing::debug!(
            operation = self.operation,
            duration_us = duration_us,
            "Operation completed"
        );

        duration_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = IndexMetrics::new();
        assert_eq!(metrics.summary(), MetricsSummary::default());
    }

    #[test]
    fn test_track_insert() {
        let metrics = IndexMetrics::new();
        metrics.track_insert(true);
        metrics.track_insert(true);
        metrics.track_insert(false);
        assert_eq!(metrics.inserts_total(), 2);
        assert_eq!(metrics.duplicate_inserts_total(), 1);
    }

    #[test]
    fn test_track_merge() {
        let metrics = IndexMetrics::new();
        metrics.track_merge(3, 1);
        metrics.track_merge(2, 0);
        assert_eq!(metrics.records_merged_total(), 5);
        assert_eq!(metrics.merge_collisions_total(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = IndexMetrics::new();
        let clone = metrics.clone();
        clone.track_delete();
        clone.track_update();
        clone.track_validation_failure();
        assert_eq!(metrics.deletes_total(), 1);
        assert_eq!(metrics.updates_total(), 1);
        assert_eq!(metrics.validation_failures_total(), 1);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.finish() >= 2_000);
    }
}
