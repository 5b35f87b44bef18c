//! Operator interaction state.
//!
//! # Responsibility
//! - Drive the search → results → add-missing workflow over a service.
//! - Own input debouncing as an explicit timer handle.
//!
//! # Invariants
//! - Results are always re-read from the store after a successful add.
//! - A failed step leaves the session in its last stable state.

mod debounce;
mod operator;

pub use debounce::{DebounceTimer, DEFAULT_DEBOUNCE_DELAY};
pub use operator::{OperatorSession, SessionError, SessionState};
