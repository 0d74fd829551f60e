//! AVL node and the structural algorithms that operate on owned subtrees.
//!
//! Every function here takes a subtree by value and hands back the (possibly
//! new) subtree root, so rotations only ever move boxes between parents.
//! Heights are recomputed bottom-up on the way back out of each recursion.

use crate::models::{Record, RecordKey};
use std::cmp::Ordering;

/// An exclusively owned, possibly empty subtree.
pub(crate) type Link = Option<Box<Node>>;

/// A tree node owning one record and both of its subtrees.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) record: Record,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) height: u32,
}

impl Node {
    /// A fresh leaf (height 1).
    pub(crate) fn leaf(record: Record) -> Box<Self> {
        Box::new(Self {
            record,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Recompute the cached height from the children's cached heights.
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// height(left) - height(right)
    pub(crate) fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

/// Height of a subtree; empty subtrees have height 0.
pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance_of(link: &Link) -> i64 {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

fn key_cmp(key: &RecordKey, record: &Record) -> Ordering {
    record.cmp_key(&key.name, &key.phone, &key.email)
}

/// Rotate right around `y`; its left child becomes the subtree root.
///
/// Returns `y` untouched if it has no left child.
pub(crate) fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Rotate left around `x`; its right child becomes the subtree root.
///
/// Returns `x` untouched if it has no right child.
pub(crate) fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Insert `record` (whose exact key is `key`) below `link`.
///
/// Returns the new subtree root and whether the record was placed. An
/// existing record with the same key leaves the subtree exactly as it was.
pub(crate) fn insert(link: Link, record: Record, key: &RecordKey) -> (Box<Node>, bool) {
    let Some(mut node) = link else {
        return (Node::leaf(record), true);
    };

    let inserted = match key_cmp(key, &node.record) {
        Ordering::Less => {
            let (child, inserted) = insert(node.left.take(), record, key);
            node.left = Some(child);
            inserted
        }
        Ordering::Greater => {
            let (child, inserted) = insert(node.right.take(), record, key);
            node.right = Some(child);
            inserted
        }
        Ordering::Equal => return (node, false),
    };

    if !inserted {
        return (node, false);
    }

    node.update_height();
    (rebalance_after_insert(node, key), true)
}

/// Insert-path rebalancing: the side of the new key relative to the heavy
/// child decides between a single and a double rotation.
fn rebalance_after_insert(mut node: Box<Node>, key: &RecordKey) -> Box<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        if let Some(left) = node.left.take() {
            // left-right case
            node.left = Some(if key_cmp(key, &left.record) == Ordering::Greater {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if let Some(right) = node.right.take() {
            // right-left case
            node.right = Some(if key_cmp(key, &right.record) == Ordering::Less {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }

    node
}

/// Delete-path rebalancing: the same-side child's balance decides between a
/// single and a double rotation.
pub(crate) fn rebalance(mut node: Box<Node>) -> Box<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        if balance_of(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if balance_of(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Remove the record with the given exact key from below `link` in a single
/// descent.
///
/// Returns the new subtree and the removed record; a missing key returns the
/// subtree unchanged and `None`.
pub(crate) fn remove(link: Link, name: &str, phone: &str, email: &str) -> (Link, Option<Record>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match node.record.cmp_key(name, phone, email) {
        Ordering::Less => {
            let (child, removed) = remove(node.left.take(), name, phone, email);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove(node.right.take(), name, phone, email);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, child) | (child, None) => {
                let Node { record, .. } = *node;
                return (child, Some(record));
            }
            (Some(left), Some(right)) => {
                let (right, successor) = take_min(right);
                node.left = Some(left);
                node.right = right;
                Some(std::mem::replace(&mut node.record, successor))
            }
        },
    };

    if removed.is_none() {
        return (Some(node), None);
    }

    node.update_height();
    (Some(rebalance(node)), removed)
}

/// Detach the leftmost record of a non-empty subtree, rebalancing on the way
/// back up.
fn take_min(mut node: Box<Node>) -> (Link, Record) {
    match node.left.take() {
        None => {
            let Node { record, right, .. } = *node;
            (right, record)
        }
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            node.update_height();
            (Some(rebalance(node)), min)
        }
    }
}

/// Exclusive-reference lookup, used for in-place edits of display fields.
pub(crate) fn find_mut<'a>(
    link: &'a mut Link,
    name: &str,
    phone: &str,
    email: &str,
) -> Option<&'a mut Record> {
    let node = link.as_deref_mut()?;
    match node.record.cmp_key(name, phone, email) {
        Ordering::Less => find_mut(&mut node.left, name, phone, email),
        Ordering::Greater => find_mut(&mut node.right, name, phone, email),
        Ordering::Equal => Some(&mut node.record),
    }
}
