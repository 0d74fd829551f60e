//! Field validation for contact records.
//!
//! Validation is reported as data. The index accepts records regardless of
//! their content; callers decide whether invalid fields block an insert.

pub mod validator;

pub use validator::{
    find_invalid, is_valid, is_valid_email, is_valid_name, is_valid_phone, validate_fields,
    validate_record, InvalidRecord,
};
