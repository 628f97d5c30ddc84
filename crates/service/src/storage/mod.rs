//! Storage abstractions for service layer
//!
//! Reusable file-backed stores that persist a whole serde document as JSON.

pub mod json_document_store;
