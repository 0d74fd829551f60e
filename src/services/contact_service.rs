//! Contact service layer.
//!
//! Business logic on top of the index: validation-gated insertion, searches,
//! favorites and groups, duplicate scan and merge, and counters.

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::index::ContactIndex;
use crate::matching::DuplicateDetector;
use crate::merge::{MergeEngine, MergeReport};
use crate::models::{Record, RecordKey};
use crate::observability::{IndexMetrics, MetricsSummary, Timer};
use crate::validation::{self, InvalidRecord};
use serde::Serialize;

/// Size and shape of the index plus lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub len: usize,
    pub height: u32,
    pub metrics: MetricsSummary,
}

/// Contact service trait for business operations.
pub trait ContactService: Send {
    /// Validate the three key fields, then insert.
    ///
    /// Fails with [`ServiceError::Invalid`] listing every failing field, or
    /// [`ServiceError::DuplicateKey`] when the exact key is already present.
    fn add_contact(&mut self, record: Record) -> ServiceResult<()>;

    /// Insert without validating. Still refuses duplicate keys.
    fn add_contact_unchecked(&mut self, record: Record) -> ServiceResult<()>;

    /// Look up a record by exact key.
    fn find_contact(&self, key: &RecordKey) -> ServiceResult<Record>;

    /// Replace the key fields of a record, keeping its display fields.
    ///
    /// Returns `false` only when `old` is absent. If `new` already belongs to
    /// another record the replacement is dropped and this still returns
    /// `true`; use [`ContactService::update_checked`] to refuse that case.
    fn update_contact(&mut self, old: &RecordKey, new: RecordKey) -> bool;

    /// Replace the key fields of a record, refusing before any change when
    /// `old` is absent or `new` belongs to a different record.
    fn update_checked(&mut self, old: &RecordKey, new: RecordKey) -> ServiceResult<Record>;

    /// Validate the new key fields, then [`ContactService::update_checked`].
    fn update_validated(&mut self, old: &RecordKey, new: RecordKey) -> ServiceResult<Record>;

    /// Remove a record by exact key. Absent keys are not an error.
    fn delete_contact(&mut self, key: &RecordKey) -> Option<Record>;

    /// Every record in index order.
    fn snapshot(&self) -> Vec<Record>;

    /// One text line per record in index order.
    fn listing(&self) -> String;

    /// Case-insensitive substring search on names.
    fn search_by_name(&self, term: &str) -> Vec<Record>;

    /// Substring search on raw phone numbers.
    fn search_by_phone(&self, term: &str) -> Vec<Record>;

    /// Starred records.
    fn favorites(&self) -> Vec<Record>;

    /// Records tagged with `tag`, case-insensitively.
    fn in_group(&self, tag: &str) -> Vec<Record>;

    /// Flip the favorite flag, returning the new value.
    fn toggle_favorite(&mut self, key: &RecordKey) -> ServiceResult<bool>;

    /// Replace the group tags of a record.
    fn set_groups(&mut self, key: &RecordKey, groups: String) -> ServiceResult<()>;

    /// Replace or clear the photo of a record.
    fn set_photo(&mut self, key: &RecordKey, photo: Option<String>) -> ServiceResult<()>;

    /// Groups of near-duplicate records in the current snapshot.
    fn find_duplicates(&self) -> Vec<Vec<Record>>;

    /// Records fuzzy-equal to `query`, other than `query` itself.
    fn similar_to(&self, query: &Record) -> Vec<Record>;

    /// Scan for duplicates and merge every group into the index.
    fn merge_duplicates(&mut self) -> MergeReport;

    /// Records failing validation, with the failing fields.
    fn find_invalid(&self) -> Vec<InvalidRecord>;

    /// Size, height and counters.
    fn stats(&self) -> IndexStats;
}

/// Default implementation of ContactService.
///
/// Owns one index; nothing is shared between instances.
#[derive(Debug, Clone, Default)]
pub struct ContactServiceImpl {
    index: ContactIndex,
    detector: DuplicateDetector,
    engine: MergeEngine,
    metrics: IndexMetrics,
}

impl ContactServiceImpl {
    /// Create a service over an empty index.
    pub fn new(config: &Config) -> Self {
        Self::with_index(ContactIndex::new(), config)
    }

    /// Create a service over an existing index.
    pub fn with_index(index: ContactIndex, config: &Config) -> Self {
        Self {
            index,
            detector: DuplicateDetector::with_name_slack(config.name_slack),
            engine: MergeEngine::new(config.merge_strategy),
            metrics: IndexMetrics::new(),
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &ContactIndex {
        &self.index
    }

    /// Counters shared with any clone of this tracker.
    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }

    fn insert_tracked(&mut self, record: Record) -> ServiceResult<()> {
        let key = record.key();
        let inserted = self.index.insert(record);
        self.metrics.track_insert(inserted);
        if inserted {
            tracing::debug!(key = %key, "Contact added");
            Ok(())
        } else {
            Err(ServiceError::DuplicateKey(key))
        }
    }

    /// The record at `old` with its key fields replaced by `new`.
    fn rekeyed(&self, old: &RecordKey, new: RecordKey) -> Option<Record> {
        let current = self.index.get(old)?;
        Some(Record {
            name: new.name,
            phone: new.phone,
            email: new.email,
            ..current.clone()
        })
    }
}

fn owned(records: Vec<&Record>) -> Vec<Record> {
    records.into_iter().cloned().collect()
}

impl ContactService for ContactServiceImpl {
    fn add_contact(&mut self, record: Record) -> ServiceResult<()> {
        let failures = validation::validate_record(&record);
        if !failures.is_empty() {
            self.metrics.track_validation_failure();
            tracing::debug!(key = %record.key(), ?failures, "Contact rejected by validation");
            return Err(ServiceError::Invalid(failures));
        }
        self.insert_tracked(record)
    }

    fn add_contact_unchecked(&mut self, record: Record) -> ServiceResult<()> {
        self.insert_tracked(record)
    }

    fn find_contact(&self, key: &RecordKey) -> ServiceResult<Record> {
        self.index
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(key.clone()))
    }

    fn update_contact(&mut self, old: &RecordKey, new: RecordKey) -> bool {
        let Some(replacement) = self.rekeyed(old, new) else {
            return false;
        };
        let updated = self.index.update(old, replacement);
        if updated {
            self.metrics.track_update();
        }
        updated
    }

    fn update_checked(&mut self, old: &RecordKey, new: RecordKey) -> ServiceResult<Record> {
        if !self.index.contains(old) {
            return Err(ServiceError::NotFound(old.clone()));
        }
        if *old != new && self.index.contains(&new) {
            return Err(ServiceError::DuplicateKey(new));
        }
        let replacement = self
            .rekeyed(old, new)
            .ok_or_else(|| ServiceError::NotFound(old.clone()))?;

        self.index.update(old, replacement.clone());
        self.metrics.track_update();
        tracing::debug!(old = %old, new = %replacement.key(), "Contact updated");
        Ok(replacement)
    }

    fn update_validated(&mut self, old: &RecordKey, new: RecordKey) -> ServiceResult<Record> {
        let failures = validation::validate_fields(&new.name, &new.phone, &new.email);
        if !failures.is_empty() {
            self.metrics.track_validation_failure();
            return Err(ServiceError::Invalid(failures));
        }
        self.update_checked(old, new)
    }

    fn delete_contact(&mut self, key: &RecordKey) -> Option<Record> {
        let removed = self.index.remove(key);
        if removed.is_some() {
            self.metrics.track_delete();
            tracing::debug!(key = %key, "Contact deleted");
        }
        removed
    }

    fn snapshot(&self) -> Vec<Record> {
        self.index.snapshot()
    }

    fn listing(&self) -> String {
        self.index.listing()
    }

    fn search_by_name(&self, term: &str) -> Vec<Record> {
        owned(self.index.search_by_name(term))
    }

    fn search_by_phone(&self, term: &str) -> Vec<Record> {
        owned(self.index.search_by_phone(term))
    }

    fn favorites(&self) -> Vec<Record> {
        owned(self.index.favorites())
    }

    fn in_group(&self, tag: &str) -> Vec<Record> {
        owned(self.index.in_group(tag))
    }

    fn toggle_favorite(&mut self, key: &RecordKey) -> ServiceResult<bool> {
        self.index
            .toggle_favorite(key)
            .ok_or_else(|| ServiceError::NotFound(key.clone()))
    }

    fn set_groups(&mut self, key: &RecordKey, groups: String) -> ServiceResult<()> {
        if self.index.set_groups(key, groups) {
            Ok(())
        } else {
            Err(ServiceError::NotFound(key.clone()))
        }
    }

    fn set_photo(&mut self, key: &RecordKey, photo: Option<String>) -> ServiceResult<()> {
        if self.index.set_photo(key, photo) {
            Ok(())
        } else {
            Err(ServiceError::NotFound(key.clone()))
        }
    }

    fn find_duplicates(&self) -> Vec<Vec<Record>> {
        self.detector.find_groups(&self.index.snapshot())
    }

    fn similar_to(&self, query: &Record) -> Vec<Record> {
        self.detector.similar_to(query, &self.index.snapshot())
    }

    fn merge_duplicates(&mut self) -> MergeReport {
        let timer = Timer::new("merge_duplicates");
        let groups = self.find_duplicates();
        let report = self.engine.merge_duplicates(&mut self.index, &groups);
        self.metrics.track_merge(report.merged, report.skipped);
        timer.finish();
        report
    }

    fn find_invalid(&self) -> Vec<InvalidRecord> {
        validation::find_invalid(&self.index.snapshot())
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            len: self.index.len(),
            height: self.index.height(),
            metrics: self.metrics.summary(),
        }
    }
}
