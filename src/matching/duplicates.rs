//! Near-duplicate detection over a sorted snapshot.
//!
//! Detection never touches the index; it works on the records a snapshot
//! hands it and reports groups of records that share a fuzzy identity.

use super::normalizer::{
    is_fuzzy_duplicate, normalize_email, normalize_name, normalize_phone, FuzzyKey,
};
use crate::models::Record;
use std::collections::{HashMap, HashSet};

/// Default allowed length difference for the name-containment rule.
pub const DEFAULT_NAME_SLACK: usize = 2;

/// Which normalized field a candidate group was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Phone,
    Email,
    Name,
}

/// Finds records that are fuzzy-equal.
#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    name_slack: usize,
}

impl DuplicateDetector {
    /// Create a detector with the default name slack.
    pub fn new() -> Self {
        Self::with_name_slack(DEFAULT_NAME_SLACK)
    }

    /// Create a detector that treats names contained in one another as equal
    /// when their lengths differ by at most `name_slack` characters.
    pub fn with_name_slack(name_slack: usize) -> Self {
        Self { name_slack }
    }

    /// The configured name slack.
    pub fn name_slack(&self) -> usize {
        self.name_slack
    }

    /// Whether two records are fuzzy-equal. See [`FuzzyKey::matches`].
    pub fn is_duplicate(&self, a: &Record, b: &Record) -> bool {
        is_fuzzy_duplicate(a, b, self.name_slack)
    }

    fn keys_match(&self, a: &FuzzyKey, b: &FuzzyKey) -> bool {
        a.matches(b, self.name_slack)
    }

    /// Every record in `records` fuzzy-equal to `query`, excluding records
    /// with the query's exact key.
    pub fn similar_to(&self, query: &Record, records: &[Record]) -> Vec<Record> {
        let query_key = FuzzyKey::of(query);
        records
            .iter()
            .filter(|record| !record.same_key(query))
            .filter(|record| self.keys_match(&query_key, &FuzzyKey::of(record)))
            .cloned()
            .collect()
    }

    /// Find groups of duplicate records in a snapshot.
    ///
    /// Records are bucketed by normalized phone, email and name (empty keys
    /// are never bucketed). Every bucket holding two or more records is a
    /// candidate; phone buckets come first, then email, then name, each in
    /// order of first appearance. Candidates holding exactly the same set of
    /// records as an earlier one are dropped.
    pub fn find_groups(&self, records: &[Record]) -> Vec<Vec<Record>> {
        self.find_tagged_groups(records)
            .into_iter()
            .map(|(_, group)| group)
            .collect()
    }

    /// Same as [`DuplicateDetector::find_groups`], keeping the field each
    /// group was found by.
    pub fn find_tagged_groups(&self, records: &[Record]) -> Vec<(MatchType, Vec<Record>)> {
        let mut candidates: Vec<(MatchType, Vec<&Record>)> = Vec::new();

        for (match_type, normalize) in [
            (MatchType::Phone, normalize_phone as fn(&str) -> String),
            (MatchType::Email, normalize_email),
            (MatchType::Name, normalize_name),
        ] {
            let buckets = bucket_by(records, |record| normalize(field(record, match_type)));
            candidates.extend(
                buckets
                    .into_iter()
                    .filter(|bucket| bucket.len() > 1)
                    .map(|bucket| (match_type, bucket)),
            );
        }

        let mut seen: HashSet<Vec<(&str, &str, &str)>> = HashSet::new();
        let mut groups = Vec::new();
        for (match_type, bucket) in candidates {
            let mut members: Vec<(&str, &str, &str)> =
                bucket.iter().map(|record| record.key_tuple()).collect();
            members.sort_unstable();
            if seen.insert(members) {
                groups.push((match_type, bucket.into_iter().cloned().collect()));
            }
        }

        tracing::debug!(
            records = records.len(),
            groups = groups.len(),
            "Duplicate scan completed"
        );
        groups
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn field(record: &Record, match_type: MatchType) -> &str {
    match match_type {
        MatchType::Phone => &record.phone,
        MatchType::Email => &record.email,
        MatchType::Name => &record.name,
    }
}

/// Group records by a derived key, skipping empty keys. Buckets come back in
/// order of first appearance.
fn bucket_by<'a, F>(records: &'a [Record], key_of: F) -> Vec<Vec<&'a Record>>
where
    F: Fn(&Record) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&Record>> = Vec::new();

    for record in records {
        let key = key_of(record);
        if key.is_empty() {
            continue;
        }
        match positions.get(&key) {
            Some(&position) => buckets[position].push(record),
            None => {
                positions.insert(key, buckets.len());
                buckets.push(vec![record]);
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, phone: &str, email: &str) -> Record {
        Record::new(name, phone, email)
    }

    #[test]
    fn test_is_duplicate_by_phone() {
        let detector = DuplicateDetector::new();
        assert!(detector.is_duplicate(
            &rec("Alice", "555-123-4567", "a@x.com"),
            &rec("Bob", "(555) 1234567", "b@x.com"),
        ));
    }

    #[test]
    fn test_is_duplicate_by_email() {
        let detector = DuplicateDetector::new();
        assert!(detector.is_duplicate(
            &rec("Alice", "1", "Shared@X.com "),
            &rec("Bob", "2", "shared@x.com"),
        ));
    }

    #[test]
    fn test_is_duplicate_ignores_empty_fields() {
        let detector = DuplicateDetector::new();
        assert!(!detector.is_duplicate(&rec("Alice", "", ""), &rec("Bob", "n/a", "")));
        assert!(!detector.is_duplicate(&rec("", "1", "a"), &rec("", "2", "b")));
        assert!(!detector.is_duplicate(&rec("", "1", "a"), &rec("Al", "2", "b")));
    }

    #[test]
    fn test_is_duplicate_by_name_containment() {
        let detector = DuplicateDetector::new();
        assert!(detector.is_duplicate(&rec("jane doe", "1", "a"), &rec("Jane Does", "2", "b")));
        assert!(detector.is_duplicate(&rec("Jon", "1", "a"), &rec("Jonas", "2", "b")));
        assert!(!detector.is_duplicate(&rec("Jon", "1", "a"), &rec("Jonathan", "2", "b")));

        let strict = DuplicateDetector::with_name_slack(0);
        assert!(!strict.is_duplicate(&rec("Jon", "1", "a"), &rec("Jonas", "2", "b")));
        assert!(strict.is_duplicate(&rec("jon", "1", "a"), &rec("JON", "2", "b")));
    }

    #[test]
    fn test_find_groups_jane_doe() {
        let detector = DuplicateDetector::new();
        let mut records = vec![
            rec("Jane Doe", "5551234567", "jane@x.com"),
            rec("jane doe", "555-123-4567", "JANE@X.COM"),
        ];
        records.sort_by(|a, b| a.exact_cmp(b));

        let groups = detector.find_groups(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_find_groups_keeps_distinct_sets() {
        let detector = DuplicateDetector::new();
        let records = vec![
            rec("Alice", "5550000001", "shared@x.com"),
            rec("Bob", "5550000001", "bob@x.com"),
            rec("Carol", "5550000003", "shared@x.com"),
        ];

        let groups = detector.find_tagged_groups(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, MatchType::Phone);
        assert_eq!(groups[0].1[0].name, "Alice");
        assert_eq!(groups[0].1[1].name, "Bob");
        assert_eq!(groups[1].0, MatchType::Email);
        assert_eq!(groups[1].1[1].name, "Carol");
    }

    #[test]
    fn test_find_groups_none() {
        let detector = DuplicateDetector::new();
        let records = vec![rec("Alice", "1", "a@x.com"), rec("Bob", "2", "b@x.com")];
        assert!(detector.find_groups(&records).is_empty());
        assert!(detector.find_groups(&[]).is_empty());
    }

    #[test]
    fn test_similar_to_excludes_query() {
        let detector = DuplicateDetector::new();
        let records = vec![
            rec("Jane Doe", "5551234567", "jane@x.com"),
            rec("John Roe", "5559999999", "john@x.com"),
        ];
        let query = rec("Jane Doe", "5551234567", "jane@x.com");
        assert!(detector.similar_to(&query, &records).is_empty());

        let query = rec("JANE DOE", "", "");
        let similar = detector.similar_to(&query, &records);
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].name, "Jane Doe");
    }
}
