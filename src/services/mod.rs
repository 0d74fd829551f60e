//! Application service layer.
//!
//! Services contain business logic and orchestrate the index, the duplicate
//! detector and the merge engine. They provide a clean boundary between the
//! command handlers and the data structures.

mod contact_service;

pub use contact_service::{ContactService, ContactServiceImpl, IndexStats};
