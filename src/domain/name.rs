//! ContactName value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ASCII letters and ASCII whitespace only
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?-u:[A-Za-z\s])+$").expect("name pattern is a valid regex"));

/// Shortest accepted name, counted after trimming.
const MIN_NAME_LENGTH: usize = 2;

/// A type-safe wrapper for contact names.
///
/// Names are letters and spaces only, at least two characters long once
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactName(String);

impl ContactName {
    /// Create a new ContactName, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidName` if the name is invalid.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if !Self::is_valid(&name) {
            return Err(ValidationError::InvalidName(name));
        }

        Ok(Self(name.trim().to_string()))
    }

    /// Validate name format (after trimming).
    pub fn is_valid(name: &str) -> bool {
        let trimmed = name.trim();
        trimmed.len() >= MIN_NAME_LENGTH && NAME_PATTERN.is_match(trimmed)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for ContactName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContactName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContactName::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
