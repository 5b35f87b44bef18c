//! Operator text parsing.
//!
//! # Responsibility
//! - Turn pasted multi-line text into candidate records.
//! - Split comma-separated identifier lists into tokens.
//!
//! # Invariants
//! - Parsing is pure: the same input always yields the same output.
//! - Non-matching lines are dropped, never fatal.

mod block;
mod tokens;

pub use block::{parse_block, parse_block_report, BlockParseReport, BlockParser, ParseError};
pub use tokens::split_tokens;
