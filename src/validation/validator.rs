//! Predicates over raw field values and whole records.

use crate::domain::{ContactName, EmailAddress, InvalidField, PhoneNumber};
use crate::models::Record;
use serde::Serialize;

/// Letters and spaces only, at least two characters after trimming.
pub fn is_valid_name(name: &str) -> bool {
    ContactName::is_valid(name)
}

/// Exactly ten digits after trimming.
pub fn is_valid_phone(phone: &str) -> bool {
    PhoneNumber::is_valid(phone)
}

/// `local@domain.tld` after trimming.
pub fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}

/// Every field that fails its check, in name, phone, email order.
pub fn validate_fields(name: &str, phone: &str, email: &str) -> Vec<InvalidField> {
    let mut failures = Vec::new();
    if !is_valid_name(name) {
        failures.push(InvalidField::Name);
    }
    if !is_valid_phone(phone) {
        failures.push(InvalidField::Phone);
    }
    if !is_valid_email(email) {
        failures.push(InvalidField::Email);
    }
    failures
}

/// Failing fields of a record.
pub fn validate_record(record: &Record) -> Vec<InvalidField> {
    validate_fields(&record.name, &record.phone, &record.email)
}

/// Whether all three fields of `record` are valid.
pub fn is_valid(record: &Record) -> bool {
    is_valid_name(&record.name) && is_valid_phone(&record.phone) && is_valid_email(&record.email)
}

/// A record that failed validation and the fields that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRecord {
    pub record: Record,
    pub fields: Vec<InvalidField>,
}

/// Every invalid record in `records`, in the order given.
pub fn find_invalid(records: &[Record]) -> Vec<InvalidRecord> {
    let invalid: Vec<InvalidRecord> = records
        .iter()
        .filter_map(|record| {
            let fields = validate_record(record);
            (!fields.is_empty()).then(|| InvalidRecord {
                record: record.clone(),
                fields,
            })
        })
        .collect();

    tracing::debug!(
        checked = records.len(),
        invalid = invalid.len(),
        "Validation scan completed"
    );
    invalid
}
