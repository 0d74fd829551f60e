//! The ordered contact index.

use super::node::{self, Link, Node};
use crate::error::{InvariantResult, InvariantViolation};
use crate::models::{Record, RecordKey};
use std::cmp::Ordering;
use std::fmt::Write as _;

/// A height-balanced (AVL) tree of records ordered by exact key.
///
/// Point operations are O(log n). The index only rejects exact-key
/// duplicates; field validation is left to callers.
///
/// # Example
///
/// ```
/// use contact_index::{ContactIndex, Record};
///
/// let mut index = ContactIndex::new();
/// assert!(index.insert(Record::new("Jane Doe", "5551234567", "jane@x.com")));
/// assert!(!index.insert(Record::new("Jane Doe", "5551234567", "jane@x.com")));
/// assert!(index.find("Jane Doe", "5551234567", "jane@x.com").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContactIndex {
    root: Link,
    len: usize,
}

impl ContactIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Insert a record.
    ///
    /// Returns `false`, leaving the tree untouched, if a record with the same
    /// exact key is already present.
    pub fn insert(&mut self, record: Record) -> bool {
        let key = record.key();
        let (root, inserted) = node::insert(self.root.take(), record, &key);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        } else {
            tracing::trace!(key = %key, "Insert rejected: exact key already present");
        }
        inserted
    }

    /// Look up a record by its exact key.
    pub fn find(&self, name: &str, phone: &str, email: &str) -> Option<&Record> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match node.record.cmp_key(name, phone, email) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            }
        }
        None
    }

    /// Look up a record by an owned key.
    pub fn get(&self, key: &RecordKey) -> Option<&Record> {
        self.find(&key.name, &key.phone, &key.email)
    }

    /// Whether a record with this exact key exists.
    pub fn contains(&self, key: &RecordKey) -> bool {
        self.get(key).is_some()
    }

    /// Replace the record at `old` with `replacement`.
    ///
    /// Returns `false` if `old` is absent. When `replacement`'s key already
    /// belongs to another record, the old record is still removed and the
    /// replacement is dropped; callers that need to avoid this should check
    /// [`ContactIndex::contains`] first.
    pub fn update(&mut self, old: &RecordKey, replacement: Record) -> bool {
        if self.remove(old).is_none() {
            return false;
        }
        if !self.insert(replacement) {
            tracing::debug!(old = %old, "Update discarded: new key collides with an existing record");
        }
        true
    }

    /// Delete the record with this exact key.
    ///
    /// Deleting a missing key is a no-op and returns `None`.
    pub fn delete(&mut self, name: &str, phone: &str, email: &str) -> Option<Record> {
        let (root, removed) = node::remove(self.root.take(), name, phone, email);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Delete by owned key.
    pub fn remove(&mut self, key: &RecordKey) -> Option<Record> {
        self.delete(&key.name, &key.phone, &key.email)
    }

    /// In-order iterator over the records, sorted by exact key.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root, self.len)
    }

    /// Owned, sorted copy of every record.
    pub fn snapshot(&self) -> Vec<Record> {
        self.iter().cloned().collect()
    }

    /// Human-readable listing, one record per line in index order.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for record in self.iter() {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{}", record);
        }
        out
    }

    /// Records whose name contains `term`, ignoring case.
    pub fn search_by_name(&self, term: &str) -> Vec<&Record> {
        let needle = term.to_lowercase();
        self.iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Records whose raw phone contains `term`.
    pub fn search_by_phone(&self, term: &str) -> Vec<&Record> {
        self.iter()
            .filter(|record| record.phone.contains(term))
            .collect()
    }

    /// Starred records.
    pub fn favorites(&self) -> Vec<&Record> {
        self.iter().filter(|record| record.favorite).collect()
    }

    /// Records tagged with `tag`.
    pub fn in_group(&self, tag: &str) -> Vec<&Record> {
        self.iter().filter(|record| record.has_tag(tag)).collect()
    }

    /// Set the favorite flag in place. Returns `false` if the key is absent.
    pub fn set_favorite(&mut self, key: &RecordKey, favorite: bool) -> bool {
        self.edit(key, |record| record.favorite = favorite)
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&mut self, key: &RecordKey) -> Option<bool> {
        let record = node::find_mut(&mut self.root, &key.name, &key.phone, &key.email)?;
        record.favorite = !record.favorite;
        Some(record.favorite)
    }

    /// Replace the group tags in place.
    pub fn set_groups(&mut self, key: &RecordKey, groups: impl Into<String>) -> bool {
        let groups = groups.into();
        self.edit(key, |record| record.groups = groups)
    }

    /// Replace the photo path in place.
    pub fn set_photo(&mut self, key: &RecordKey, photo: Option<String>) -> bool {
        self.edit(key, |record| record.photo = photo)
    }

    fn edit(&mut self, key: &RecordKey, apply: impl FnOnce(&mut Record)) -> bool {
        match node::find_mut(&mut self.root, &key.name, &key.phone, &key.email) {
            Some(record) => {
                apply(record);
                true
            }
            None => false,
        }
    }

    /// Verify ordering, cached heights, the balance bound and the length.
    pub fn check_invariants(&self) -> InvariantResult<()> {
        check_subtree(&self.root)?;

        let mut counted = 0;
        let mut previous: Option<&Record> = None;
        for record in self.iter() {
            if let Some(prev) = previous {
                if prev.exact_cmp(record) != Ordering::Less {
                    return Err(InvariantViolation::OutOfOrder { key: record.key() });
                }
            }
            previous = Some(record);
            counted += 1;
        }

        if counted != self.len {
            return Err(InvariantViolation::LengthMismatch {
                counted,
                recorded: self.len,
            });
        }
        Ok(())
    }
}

/// Returns the recomputed height of the subtree.
fn check_subtree(link: &Link) -> InvariantResult<u32> {
    let Some(node) = link else {
        return Ok(0);
    };
    let left = check_subtree(&node.left)?;
    let right = check_subtree(&node.right)?;
    let actual = 1 + left.max(right);

    if node.height != actual {
        return Err(InvariantViolation::StaleHeight {
            key: node.record.key(),
            cached: node.height,
            actual,
        });
    }

    let balance = i64::from(left) - i64::from(right);
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced {
            key: node.record.key(),
            balance,
        });
    }
    Ok(actual)
}

impl FromIterator<Record> for ContactIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut index = ContactIndex::new();
        index.extend(iter);
        index
    }
}

impl Extend<Record> for ContactIndex {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<'a> IntoIterator for &'a ContactIndex {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing in-order iterator over a [`ContactIndex`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(root: &'a Link, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
