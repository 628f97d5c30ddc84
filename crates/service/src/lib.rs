//! Service layer for the student roster.
//! - `roster` holds the domain types, the repository seam and the operations.
//! - `storage` and `file` persist the roster document as a JSON file.

pub mod errors;
pub mod roster;
pub mod runtime;
pub mod storage;
pub mod file;
