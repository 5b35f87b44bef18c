//! Domain model for question records.
//!
//! # Responsibility
//! - Define the record shape shared by parsing, persistence and export.
//! - Define the fixed category set and its wire tags.
//!
//! # Invariants
//! - Every persisted record carries a repository-assigned `RecordId`.
//! - A record identifier is canonical for the record's category.

pub mod category;
pub mod record;
