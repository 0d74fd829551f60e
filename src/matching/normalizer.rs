//! Canonical forms of contact fields for fuzzy comparison.
//!
//! All functions are pure, return an empty string for empty input and are
//! idempotent: normalizing an already normalized value returns it unchanged.

use crate::models::Record;

/// Normalize a phone number for comparison.
///
/// Keeps only the ASCII digits.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize an email address for comparison.
///
/// Trims whitespace and converts to lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a name for comparison.
///
/// Splits on runs of whitespace, upper-cases the first character of each
/// word, lower-cases the rest and rejoins with single spaces.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => std::iter::once(upper_single(first))
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Upper-case `c` when its upper case is a single char; otherwise keep it.
fn upper_single(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// The normalized phone, email and name of a record: its fuzzy identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FuzzyKey {
    pub phone: String,
    pub email: String,
    pub name: String,
}

impl FuzzyKey {
    /// Normalize every identity field of `record`.
    pub fn of(record: &Record) -> Self {
        Self {
            phone: normalize_phone(&record.phone),
            email: normalize_email(&record.email),
            name: normalize_name(&record.name),
        }
    }

    /// Fuzzy equality between two normalized identities.
    ///
    /// True when any of these hold: the phones match and are non-empty; the
    /// emails match and are non-empty; the names match and are non-empty; or
    /// one name contains the other and their lengths differ by at most
    /// `name_slack` characters.
    pub fn matches(&self, other: &FuzzyKey, name_slack: usize) -> bool {
        if !self.phone.is_empty() && self.phone == other.phone {
            return true;
        }
        if !self.email.is_empty() && self.email == other.email {
            return true;
        }
        if self.name.is_empty() || other.name.is_empty() {
            return false;
        }
        if self.name == other.name {
            return true;
        }
        if self.name.contains(&other.name) || other.name.contains(&self.name) {
            let len = self.name.chars().count();
            let other_len = other.name.chars().count();
            return len.abs_diff(other_len) <= name_slack;
        }
        false
    }
}

/// Whether two records are fuzzy-equal under the given name slack.
pub fn is_fuzzy_duplicate(a: &Record, b: &Record, name_slack: usize) -> bool {
    FuzzyKey::of(a).matches(&FuzzyKey::of(b), name_slack)
}
