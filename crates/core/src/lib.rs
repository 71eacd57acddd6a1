//! Domain logic for the solution lifecycle: status machine, submission
//! validation, snapshot diffing, and the shared error taxonomy.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence layer, the lifecycle services, and the API alike.

pub mod content;
pub mod diff;
pub mod error;
pub mod roles;
pub mod status;
pub mod submission;
pub mod types;
