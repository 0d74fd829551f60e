//! Ordered, height-balanced storage for contact records.
//!
//! Records are kept in an AVL tree keyed by their exact (name, phone, email)
//! triple. Nodes exclusively own their children; nothing outside this module
//! ever sees a node, only records and in-order snapshots.

pub mod contact_index;
mod node;

pub use contact_index::{ContactIndex, Iter};
