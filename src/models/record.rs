//! Record model representing a single contact held by the index.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The exact identity of a record: its raw name, phone and email.
///
/// Ordering is field-by-field and case-sensitive, which is exactly the order
/// the index keeps its records in. Only these three fields ever take part in
/// ordering; the display fields of [`Record`] are left out.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecordKey {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl RecordKey {
    /// Create a key from the three raw fields.
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Borrow the key as a tuple, the form the index compares with.
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.name, &self.phone, &self.email)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.name, self.phone, self.email)
    }
}

/// A contact record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Record {
    /// Full name, as entered
    pub name: String,

    /// Phone number, as entered
    pub phone: String,

    /// Email address, as entered
    pub email: String,

    /// Whether the contact is starred
    pub favorite: bool,

    /// Comma-separated group tags (e.g. "Family, Work")
    #[serde(skip_serializing_if = "String::is_empty")]
    pub groups: String,

    /// Optional path to a photo/avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Record {
    /// Create a new record with the three key fields and empty display fields.
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            favorite: false,
            groups: String::new(),
            photo: None,
        }
    }

    /// Set the favorite flag.
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Set the group tags.
    pub fn with_groups(mut self, groups: impl Into<String>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Set the photo path.
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Owned copy of this record's exact key.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.name, &self.phone, &self.email)
    }

    /// Borrowed exact key.
    pub fn key_tuple(&self) -> (&str, &str, &str) {
        (&self.name, &self.phone, &self.email)
    }

    /// Compare a raw key against this record's exact key.
    ///
    /// Name first, then phone, then email; the first non-equal field wins.
    pub fn cmp_key(&self, name: &str, phone: &str, email: &str) -> Ordering {
        (name, phone, email).cmp(&self.key_tuple())
    }

    /// Compare two records by exact identity.
    pub fn exact_cmp(&self, other: &Record) -> Ordering {
        self.key_tuple().cmp(&other.key_tuple())
    }

    /// Whether two records share the same exact key.
    pub fn same_key(&self, other: &Record) -> bool {
        self.exact_cmp(other) == Ordering::Equal
    }

    /// Iterate over the trimmed, non-empty group tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.groups
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Whether the record carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim();
        !wanted.is_empty() && self.tags().any(|t| t.eq_ignore_ascii_case(wanted))
    }

    /// Merge this record with another, keeping the best data from both.
    ///
    /// Key fields keep `self`'s value unless it is empty. The favorite flag is
    /// kept if either side has it, group tags are concatenated (`self` first)
    /// and `self`'s photo wins when present.
    pub fn merge_with(&self, other: &Record) -> Record {
        fn prefer(mine: &str, theirs: &str) -> String {
            if mine.is_empty() {
                theirs.to_string()
            } else {
                mine.to_string()
            }
        }

        let groups = match (self.groups.is_empty(), other.groups.is_empty()) {
            (true, _) => other.groups.clone(),
            (false, true) => self.groups.clone(),
            (false, false) => format!("{}, {}", self.groups, other.groups),
        };

        Record {
            name: prefer(&self.name, &other.name),
            phone: prefer(&self.phone, &other.phone),
            email: prefer(&self.email, &other.email),
            favorite: self.favorite || other.favorite,
            groups,
            photo: self.photo.clone().or_else(|| other.photo.clone()),
        }
    }
}

impl From<RecordKey> for Record {
    fn from(key: RecordKey) -> Self {
        Record::new(key.name, key.phone, key.email)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {}, Phone: {}, email: {}",
            self.name, self.phone, self.email
        )
    }
}
