//! Integration tests for duplicate detection and merging.
//!
//! Detection works on a snapshot; merging writes back through the index's
//! public insert and delete.

use contact_index::matching::{DuplicateDetector, MatchType};
use contact_index::merge::{merge_group, MergeEngine, MergeStrategy};
use contact_index::{ContactIndex, Record};

mod fixtures;
use fixtures::*;

fn index_of(records: &[Record]) -> ContactIndex {
    records.iter().cloned().collect()
}

/// Test the Jane Doe scenario end to end.
///
/// This test validates:
/// - Two spellings of one person form exactly one group
/// - Merging keeps the first record's fields
/// - The index holds one Jane Doe afterwards
#[test]
fn test_jane_doe_detect_and_merge() {
    let (first, second) = jane_doe_pair();
    let mut index = index_of(&[first.clone(), second.clone()]);

    let detector = DuplicateDetector::new();
    let groups = detector.find_groups(&index.snapshot());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(groups[0].contains(&first));
    assert!(groups[0].contains(&second));

    let merged = merge_group(&groups[0]).unwrap();
    assert_eq!(merged.name, "Jane Doe");
    assert_eq!(merged.phone, "5551234567");
    assert_eq!(merged.email, "jane@x.com");

    let report = MergeEngine::default().merge_duplicates(&mut index, &groups);
    assert_eq!(report.merged, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(index.snapshot(), vec![merged]);
    index.check_invariants().unwrap();
}

#[test]
fn test_groups_ordered_phone_email_name() {
    let records = vec![
        sample_record("Ann Lee", "111", "ann@x.com"),
        sample_record("Bea Moe", "111", "bea@x.com"),
        sample_record("Cal Ng", "222", "cal@x.com"),
        sample_record("Cy Ng", "333", "CAL@x.com"),
        sample_record("dee ox", "444", "d1@x.com"),
        sample_record("Dee  Ox", "555", "d2@x.com"),
    ];

    let tagged = DuplicateDetector::new().find_tagged_groups(&records);
    let kinds: Vec<MatchType> = tagged.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, [MatchType::Phone, MatchType::Email, MatchType::Name]);
    assert_eq!(tagged[0].1[0].name, "Ann Lee");
    assert_eq!(tagged[1].1[0].name, "Cal Ng");
    assert_eq!(tagged[2].1[0].name, "dee ox");
}

#[test]
fn test_empty_fields_never_group() {
    let records = vec![
        sample_record("", "", ""),
        sample_record("  ", "n/a", " "),
        sample_record("Solo Person", "", ""),
    ];
    assert!(DuplicateDetector::new().find_groups(&records).is_empty());
}

#[test]
fn test_same_members_reported_once() {
    // Same phone, email and name: three buckets with identical membership
    let records = vec![
        sample_record("Pat Kim", "555 000 1111", "pat@x.com"),
        sample_record("pat kim", "5550001111", "PAT@X.COM"),
    ];
    assert_eq!(DuplicateDetector::new().find_groups(&records).len(), 1);
}

/// Test the name-containment rule used for pairwise checks.
///
/// This test validates:
/// - Contained names within the slack are duplicates
/// - Contained names beyond the slack are not
#[test]
fn test_name_slack() {
    let detector = DuplicateDetector::new();
    let ann = sample_record("Ann", "1", "a@x.com");
    let anna = sample_record("Anna", "2", "b@x.com");
    let annabel = sample_record("Annabel", "3", "c@x.com");

    assert!(detector.is_duplicate(&ann, &anna));
    assert!(!detector.is_duplicate(&ann, &annabel));
    assert!(DuplicateDetector::with_name_slack(4).is_duplicate(&ann, &annabel));
}

/// Test that groups sharing a record merge into one under the default
/// strategy.
///
/// This test validates:
/// - A phone group and an email group sharing a member coalesce
/// - Every original record is replaced by a single merged record
#[test]
fn test_transitive_merge_coalesces_overlaps() {
    let a = sample_record("Ann Lee", "1111111111", "ann@x.com");
    let b = sample_record("Ann B", "1111111111", "shared@x.com");
    let c = sample_record("Cat C", "3333333333", "shared@x.com");
    let mut index = index_of(&[a.clone(), b.clone(), c.clone()]);

    let groups = DuplicateDetector::new().find_groups(&index.snapshot());
    assert_eq!(groups.len(), 2);

    let report = MergeEngine::new(MergeStrategy::Transitive).merge_duplicates(&mut index, &groups);
    assert_eq!(report.merged, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(index.len(), 1);
    index.check_invariants().unwrap();
}

/// Test that a per-group pass reports a group overtaken by an earlier merge.
///
/// This test validates:
/// - The phone group merges and the overlapping email group is skipped
/// - The favorite flag and tag of the folded record survive
/// - Every reported record is still in the index
#[test]
fn test_per_group_merge_reports_collision() {
    let a = sample_record("Ann Lee", "1111111111", "ann@x.com")
        .with_favorite(true)
        .with_groups("Gym");
    let b = sample_record("Ann B", "1111111111", "shared@x.com");
    let c = sample_record("Cat C", "3333333333", "shared@x.com").with_photo("cat.png");
    let mut index = index_of(&[a, b, c.clone()]);

    let groups = DuplicateDetector::new().find_groups(&index.snapshot());
    assert_eq!(groups.len(), 2);
    let report = MergeEngine::new(MergeStrategy::PerGroup).merge_duplicates(&mut index, &groups);

    assert_eq!(report.merged, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(index.len(), 2);
    for record in &report.records {
        assert_eq!(index.get(&record.key()), Some(record));
    }

    let ann = index.find("Ann B", "1111111111", "shared@x.com").unwrap();
    assert!(ann.favorite);
    assert_eq!(ann.groups, "Gym");
    assert_eq!(index.get(&c.key()), Some(&c));
    index.check_invariants().unwrap();
}

#[test]
fn test_merge_skips_small_groups() {
    let mut index = index_of(&[sample_record("Ann", "1", "a")]);
    let groups = vec![vec![], vec![sample_record("Ann", "1", "a")]];
    let report = MergeEngine::default().merge_duplicates(&mut index, &groups);
    assert_eq!(report.merged, 0);
    assert!(report.records.is_empty());
    assert_eq!(index.len(), 1);
}

#[test]
fn test_merge_carries_display_fields() {
    let first = sample_record("Jane Doe", "5551234567", "jane@x.com").with_groups("Work");
    let second = sample_record("jane doe", "555-123-4567", "JANE@X.COM")
        .with_favorite(true)
        .with_groups("Family")
        .with_photo("jane.png");
    let mut index = index_of(&[first, second]);

    let groups = DuplicateDetector::new().find_groups(&index.snapshot());
    MergeEngine::default().merge_duplicates(&mut index, &groups);

    let merged = index.find("Jane Doe", "5551234567", "jane@x.com").unwrap();
    assert!(merged.favorite);
    assert_eq!(merged.groups, "Work, Family");
    assert_eq!(merged.photo.as_deref(), Some("jane.png"));
}
