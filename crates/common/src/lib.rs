//! Helpers shared by the roster crates: logging setup, startup checks and
//! small response types that are not tied to the roster domain.

pub mod types;
pub mod utils;
pub mod env;
