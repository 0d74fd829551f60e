//! Domain value objects and types.
//!
//! This module contains type-safe wrappers for contact names, email
//! addresses and phone numbers. Each wrapper validates its input against the
//! fixed business rules at construction time; the `is_valid` associated
//! functions expose the same checks as plain predicates.

pub mod email;
pub mod errors;
pub mod name;
pub mod phone;

pub use email::EmailAddress;
pub use errors::{InvalidField, ValidationError};
pub use name::ContactName;
pub use phone::PhoneNumber;
