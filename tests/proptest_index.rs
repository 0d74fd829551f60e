//! Property-based tests for the contact index and normalizers.
//!
//! Random insert/delete sequences are checked against a `BTreeMap` model,
//! and the tree's structural invariants are verified after every step.
//!
//! Run with: `cargo test --test proptest_index`

use contact_index::matching::{normalize_email, normalize_name, normalize_phone};
use contact_index::{ContactIndex, Record, RecordKey};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(RecordKey),
    Delete(RecordKey),
}

/// Keys from a small alphabet so inserts collide and deletes hit often.
fn key_strategy() -> impl Strategy<Value = RecordKey> {
    ("[A-Ca-c]{0,3}", "[0-9]{0,2}", "[a-b@]{0,2}")
        .prop_map(|(name, phone, email)| RecordKey::new(name, phone, email))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => key_strategy().prop_map(Op::Insert),
        2 => key_strategy().prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn index_matches_sorted_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut index = ContactIndex::new();
        let mut model: BTreeMap<RecordKey, Record> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let record = Record::from(key.clone());
                    let fresh = !model.contains_key(&key);
                    prop_assert_eq!(index.insert(record.clone()), fresh);
                    model.entry(key).or_insert(record);
                }
                Op::Delete(key) => {
                    let expected = model.remove(&key);
                    prop_assert_eq!(index.remove(&key), expected);
                }
            }
            prop_assert!(index.check_invariants().is_ok());
            prop_assert_eq!(index.len(), model.len());
        }

        let snapshot = index.snapshot();
        let expected: Vec<Record> = model.into_values().collect();
        prop_assert_eq!(snapshot, expected);
    }

    #[test]
    fn height_is_logarithmic(keys in prop::collection::vec(key_strategy(), 1..300)) {
        let index: ContactIndex = keys.into_iter().map(Record::from).collect();
        let n = index.len() as f64;
        let bound = 1.45 * (n + 2.0).log2();
        prop_assert!(f64::from(index.height()) <= bound);
    }

    #[test]
    fn every_inserted_key_is_found(keys in prop::collection::vec(key_strategy(), 0..100)) {
        let index: ContactIndex = keys.iter().cloned().map(Record::from).collect();
        for key in &keys {
            prop_assert!(index.find(&key.name, &key.phone, &key.email).is_some());
        }
    }

    #[test]
    fn normalization_is_idempotent(value in "\\PC{0,40}") {
        let phone = normalize_phone(&value);
        prop_assert_eq!(normalize_phone(&phone), phone.clone());

        let email = normalize_email(&value);
        prop_assert_eq!(normalize_email(&email), email.clone());

        let name = normalize_name(&value);
        prop_assert_eq!(normalize_name(&name), name.clone());
    }
}
