//! Shared records and indexes for integration tests.

use contact_index::{ContactIndex, Record};

/// A record with the three key fields set and empty display fields.
pub fn sample_record(name: &str, phone: &str, email: &str) -> Record {
    Record::new(name, phone, email)
}

/// A record that passes every validation rule.
#[allow(dead_code)]
pub fn valid_record(name: &str, phone: &str) -> Record {
    let local = name.to_lowercase().replace(' ', ".");
    Record::new(name, phone, format!("{}@example.com", local))
}

/// The two spellings of Jane Doe that must be detected as duplicates.
#[allow(dead_code)]
pub fn jane_doe_pair() -> (Record, Record) {
    (
        sample_record("Jane Doe", "5551234567", "jane@x.com"),
        sample_record("jane doe", "555-123-4567", "JANE@X.COM"),
    )
}

/// A perfect tree of seven records named A through G.
///
/// Inserted in level order (D, B, F, A, C, E, G), so no rotation happens and
/// the tree has height 3 with D at the root.
#[allow(dead_code)]
pub fn seven_node_index() -> ContactIndex {
    let mut index = ContactIndex::new();
    for name in ["D", "B", "F", "A", "C", "E", "G"] {
        assert!(index.insert(seven_node_record(name)));
    }
    index
}

/// The record stored under `name` in [`seven_node_index`].
#[allow(dead_code)]
pub fn seven_node_record(name: &str) -> Record {
    sample_record(name, "0000000000", "x@example.com")
}

/// Names of the records in index order.
#[allow(dead_code)]
pub fn names(index: &ContactIndex) -> Vec<String> {
    index.iter().map(|record| record.name.clone()).collect()
}
